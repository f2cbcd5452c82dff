pub(crate) mod exam_answers;
pub(crate) mod exams;
pub(crate) mod grades;
pub(crate) mod messages;
pub(crate) mod notifications;
pub(crate) mod progress;
pub(crate) mod questions;
pub(crate) mod roles;
pub(crate) mod stats;
pub(crate) mod subjects;
pub(crate) mod tasks;
pub(crate) mod topics;
pub(crate) mod users;
