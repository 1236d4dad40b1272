pub mod curriculum;
pub mod domain;
pub mod ports;
pub mod quiz;

pub use curriculum::{parse_curriculum, CurriculumParseError};
pub use domain::{DayEntry, Depth, LessonPlanRequest, Mcq, TopicRecord, User, UserCredentials};
pub use ports::{
    CurriculumGenerationService, DatabaseService, GenerationError, PortError, PortResult,
};
