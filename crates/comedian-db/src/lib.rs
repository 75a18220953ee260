//! # comedian-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `comedian-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comedian_db::pool::{create_pool, migrations_dir, run_migrations, PoolConfig};
//! use comedian_db::repositories::PgChannelRepository;
//! use comedian_core::traits::ChannelRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     run_migrations(&pool, &migrations_dir()).await?;
//!     let channels = PgChannelRepository::new(pool);
//!     let active = channels.list_active("T1").await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, migrations_dir, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgBotSettingsRepository, PgChannelRepository, PgNotificationThreadRepository,
    PgStandupRepository, PgStanduperRepository, PgTimeTableRepository, PgUserRepository,
};
