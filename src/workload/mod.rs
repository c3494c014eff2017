//! Task kinds, task simulators and units of work

pub mod task;
pub mod tasks;
pub mod unit;
pub mod workload_type;

pub use task::{task_rng, TaskDetail, TaskId, TaskParams, TaskReport};
pub use tasks::{cpu_bound_task, io_bound_task};
pub use unit::{UnitOfWork, Workload};
pub use workload_type::TaskKind;
