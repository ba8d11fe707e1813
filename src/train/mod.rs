pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;
pub mod schedule;

pub use trainer::{
    minibatch_gradient_descent, stochastic_gradient_descent, vanilla_gradient_descent,
};
pub use epoch_stats::{EpochStats, TrainingHistory};
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
pub use schedule::Schedule;
