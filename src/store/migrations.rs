//! Database migrations module
//!
//! Code-based migrations for the SQLite store. All migrations are
//! embedded directly in Rust code as SQL strings for single-binary
//! deployment. The remote table service owns its own schema, so
//! `run_migrations` is a no-op for the remote driver.
//!
//! # Architecture
//!
//! Each migration is defined as a `Migration` struct containing:
//! - `version`: Unique version number for ordering
//! - `name`: Human-readable migration name
//! - `up`: SQL statements for SQLite

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::DynTableStore;
use crate::config::StoreDriver;

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up: &'static str,
}

/// All migrations for the Folio backend.
pub const MIGRATIONS: &[Migration] = &[
    // Migration 1: Create blog_posts table
    Migration {
        version: 1,
        name: "create_blog_posts",
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                excerpt TEXT,
                slug TEXT NOT NULL UNIQUE,
                tags TEXT NOT NULL DEFAULT '[]',
                author TEXT NOT NULL DEFAULT 'Software Engineer',
                featured INTEGER NOT NULL DEFAULT 0,
                read_count INTEGER NOT NULL DEFAULT 0,
                like_count INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'published')),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_blog_posts_slug ON blog_posts(slug);
            CREATE INDEX IF NOT EXISTS idx_blog_posts_status ON blog_posts(status);
            CREATE INDEX IF NOT EXISTS idx_blog_posts_created_at ON blog_posts(created_at);
        "#,
    },
    // Migration 2: Create user_preferences table
    Migration {
        version: 2,
        name: "create_user_preferences",
        up: r#"
            CREATE TABLE IF NOT EXISTS user_preferences (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL UNIQUE,
                theme TEXT NOT NULL DEFAULT 'default' CHECK (theme IN ('default', 'ocean', 'sunset', 'light')),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_user_preferences_user_id ON user_preferences(user_id);
        "#,
    },
    // Migration 3: Create resume_links table
    Migration {
        version: 3,
        name: "create_resume_links",
        up: r#"
            CREATE TABLE IF NOT EXISTS resume_links (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                file_url TEXT NOT NULL,
                file_type TEXT NOT NULL DEFAULT 'pdf',
                file_size INTEGER,
                is_active INTEGER NOT NULL DEFAULT 1,
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_resume_links_display_order ON resume_links(display_order);
        "#,
    },
    // Migration 4: Create post_likes table (one like per post per user)
    Migration {
        version: 4,
        name: "create_post_likes",
        up: r#"
            CREATE TABLE IF NOT EXISTS post_likes (
                id TEXT PRIMARY KEY,
                post_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(post_id, user_id),
                FOREIGN KEY (post_id) REFERENCES blog_posts(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_post_likes_post_id ON post_likes(post_id);
        "#,
    },
];

/// Run all pending migrations.
///
/// For the remote driver this is a no-op: the hosted service manages
/// its own schema.
pub async fn run_migrations(store: &DynTableStore) -> Result<()> {
    if store.driver() == StoreDriver::Remote {
        tracing::info!("Remote table service manages its own schema, skipping migrations");
        return Ok(());
    }

    let pool = store
        .as_sqlite()
        .context("SQLite pool missing for sqlite driver")?;

    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;

    for migration in MIGRATIONS {
        if applied.contains(&(migration.version as i64)) {
            continue;
        }

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        // Migration SQL may contain multiple statements
        for statement in migration.up.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                sqlx::query(statement)
                    .execute(pool)
                    .await
                    .with_context(|| format!("Failed to apply migration '{}'", migration.name))?;
            }
        }

        sqlx::query("INSERT INTO _migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now())
            .execute(pool)
            .await
            .with_context(|| format!("Failed to record migration '{}'", migration.name))?;
    }

    Ok(())
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;

    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    Ok(rows.iter().map(|row| row.get("version")).collect())
}

/// Seed sample content into an empty SQLite store.
///
/// Inserts three sample posts and a default resume link when the
/// corresponding tables are empty. Intended for demos and local
/// development, enabled via the `seed_demo_data` config flag.
pub async fn seed_demo_data(store: &DynTableStore) -> Result<()> {
    let pool = match store.as_sqlite() {
        Some(pool) => pool,
        None => {
            tracing::info!("Demo seed data is only supported on the SQLite store, skipping");
            return Ok(());
        }
    };

    let post_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM blog_posts")
        .fetch_one(pool)
        .await
        .context("Failed to count blog posts")?
        .get("count");

    if post_count == 0 {
        let samples: &[(&str, &str, &str, &str, &str, bool, i64)] = &[
            (
                "Building Scalable React Applications",
                "<h2>Introduction</h2><p>Building scalable React applications requires careful planning and architecture decisions...</p>",
                "Learn the essential patterns and best practices for building scalable React applications.",
                "building-scalable-react-applications",
                r#"["React","Architecture","Performance"]"#,
                true,
                245,
            ),
            (
                "The Future of Web Development",
                "<h2>The Evolution Continues</h2><p>Web development is in a constant state of evolution...</p>",
                "Explore the emerging technologies and trends that will shape the future of web development.",
                "the-future-of-web-development",
                r#"["Web Development","Trends","Technology"]"#,
                false,
                189,
            ),
            (
                "Getting Started with TypeScript",
                "<h2>Why TypeScript?</h2><p>TypeScript brings static typing to JavaScript...</p>",
                "Learn TypeScript fundamentals and discover how static typing can improve your development.",
                "getting-started-with-typescript",
                r#"["TypeScript","JavaScript","Programming"]"#,
                true,
                312,
            ),
        ];

        let now = Utc::now();
        for (title, content, excerpt, slug, tags, featured, read_count) in samples {
            sqlx::query(
                r#"
                INSERT INTO blog_posts (id, title, content, excerpt, slug, tags, featured, read_count, status, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'published', ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(title)
            .bind(content)
            .bind(excerpt)
            .bind(slug)
            .bind(tags)
            .bind(featured)
            .bind(read_count)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await
            .context("Failed to seed sample post")?;
        }

        tracing::info!("Seeded {} sample blog posts", samples.len());
    }

    let link_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM resume_links")
        .fetch_one(pool)
        .await
        .context("Failed to count resume links")?
        .get("count");

    if link_count == 0 {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO resume_links (id, name, description, file_url, file_type, is_active, display_order, created_at, updated_at)
            VALUES (?, 'Resume', 'Full resume (PDF)', '/files/resume.pdf', 'pdf', 1, 0, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to seed default resume link")?;

        tracing::info!("Seeded default resume link");
    }

    Ok(())
}
