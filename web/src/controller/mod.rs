pub(crate) mod health_check_controller;
pub(crate) mod images_controller;
