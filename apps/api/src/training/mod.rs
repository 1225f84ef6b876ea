// Training: dataset management, synthetic augmentation, model fitting,
// artifact persistence and the model lifecycle.

pub mod artifact;
pub mod dataset;
pub mod forest;
pub mod registry;
pub mod scaler;
pub mod storage;
pub mod synthetic;
pub mod trainer;

pub use registry::{ModelRegistry, ModelStatus, RegistryError};
pub use trainer::{Trainer, TrainingConfig};
