pub mod booking;
pub mod completion;
pub mod discipline;
pub mod scheduling;
pub mod server;
pub mod team_generation;

pub use completion::CompletionService;
pub use discipline::DisciplineService;
pub use scheduling::SchedulingService;
pub use team_generation::TeamGenerationService;
