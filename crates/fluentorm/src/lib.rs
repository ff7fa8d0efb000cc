//! fluentorm - typed, attribute-synchronized properties for ORM entities.
//!
//! Declare an entity as a struct of [`Slot`] properties next to its base
//! model, register its metadata once, and let the [`Fluent`] hooks keep the
//! two in sync.
//!
//! # Example
//!
//! ```
//! use fluentorm::{
//!     attributes, bind_properties, Bindings, EntitySchema, Fluent, Model, ModelConfig,
//!     PropertyDef, Slot, Value,
//! };
//!
//! struct Post {
//!     base: Model,
//!     bindings: Bindings,
//!     title: Slot<String>,
//!     views: Slot<i64>,
//! }
//!
//! bind_properties!(Post { title, views });
//!
//! impl Fluent for Post {
//!     type Base = Model;
//!
//!     fn schema() -> EntitySchema {
//!         EntitySchema::new("Post")
//!             .with_config(ModelConfig::new().unguarded())
//!             .with_property(PropertyDef::typed::<String>("title"))
//!             .with_property(PropertyDef::typed::<i64>("views").with_default(0))
//!     }
//!
//!     fn from_parts(base: Model, bindings: Bindings) -> Self {
//!         Self { base, bindings, title: Slot::empty(), views: Slot::empty() }
//!     }
//!
//!     fn base(&self) -> &Model { &self.base }
//!     fn base_mut(&mut self) -> &mut Model { &mut self.base }
//!     fn bindings(&self) -> &Bindings { &self.bindings }
//! }
//!
//! let mut post = Post::new(attributes! { "title" => "Hello" }).unwrap();
//! assert_eq!(post.views.get(), Some(&0));
//!
//! post.title.set("Hello, world");
//! assert_eq!(post.to_map().unwrap()["title"], Value::from("Hello, world"));
//! ```

pub use fluentorm_core::*;

pub mod logging {
    //! Tracing setup for binaries and tests embedding fluentorm.

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    /// Default filter when `RUST_LOG` is not set.
    pub const DEFAULT_FILTER: &str = "fluentorm=info,fluentorm_core=info";

    /// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to
    /// `default_filter`.
    ///
    /// Returns `false` if a global subscriber was already installed.
    pub fn init_tracing(default_filter: &str) -> bool {
        let installed = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!(default_filter, "tracing initialized");
        }
        installed
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_init_tracing_once() {
            init_tracing(DEFAULT_FILTER);
            assert!(!init_tracing(DEFAULT_FILTER));
        }
    }
}

pub use logging::init_tracing;
