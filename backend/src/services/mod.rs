pub mod activity_service;
pub mod task_service;
pub mod visit_service;

pub use activity_service::ActivityService;
pub use task_service::TaskService;
pub use visit_service::VisitService;
