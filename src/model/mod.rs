mod ensemble;
mod loader;
mod registry;

pub use ensemble::{Aggregation, Node, Tree, TreeEnsemble};
pub use loader::{ModelSource, load};
pub use registry::{ModelKind, ModelRegistry, ModelStatus};

use crate::Result;

/// An opaque trained model mapping a feature vector to a single scalar
/// (a class label for classifiers).
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Expected feature vector width, when the artifact declares one.
    fn feature_count(&self) -> Option<usize> {
        None
    }
}
