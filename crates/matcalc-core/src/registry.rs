//! Strategy factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::MatError;
use crate::options::Options;
use crate::strassen::StrassenConfig;
use crate::strategy::{BlockedStrategy, Multiplier, NaiveStrategy, StrassenStrategy};

/// Names accepted by [`DefaultFactory`], in report order.
pub const STRATEGY_NAMES: [&str; 3] = ["naive", "blocked", "strassen"];

/// Factory trait for creating strategies.
pub trait StrategyFactory: Send + Sync {
    /// Get or create a strategy by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier>, MatError>;

    /// List all available strategy names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    options: Options,
    cache: RwLock<HashMap<String, Arc<dyn Multiplier>>>,
}

impl DefaultFactory {
    /// Create a factory with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a factory whose strategies are configured from `options`.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            options: options.normalize(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a selection: `all` expands to every strategy, otherwise one name.
    pub fn resolve(&self, selection: &str) -> Result<Vec<Arc<dyn Multiplier>>, MatError> {
        if selection == "all" {
            STRATEGY_NAMES.iter().map(|name| self.get(name)).collect()
        } else {
            Ok(vec![self.get(selection)?])
        }
    }

    fn create_strategy(&self, name: &str) -> Result<Arc<dyn Multiplier>, MatError> {
        match name {
            "naive" => Ok(Arc::new(NaiveStrategy::new())),
            "blocked" => Ok(Arc::new(BlockedStrategy::new(self.options.block_size))),
            "strassen" => Ok(Arc::new(StrassenStrategy::new(StrassenConfig::from(
                &self.options,
            )))),
            _ => Err(MatError::Config(format!("unknown algorithm: {name}"))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier>, MatError> {
        if let Some(strategy) = self.cache.read().get(name) {
            return Ok(Arc::clone(strategy));
        }

        let strategy = self.create_strategy(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&strategy));
        Ok(strategy)
    }

    fn available(&self) -> Vec<&str> {
        STRATEGY_NAMES.to_vec()
    }
}
