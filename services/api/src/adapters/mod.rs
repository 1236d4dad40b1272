pub mod curriculum_llm;
pub mod db;

pub use curriculum_llm::GroqCurriculumAdapter;
pub use db::DbAdapter;
