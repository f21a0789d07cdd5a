pub mod bar;
pub mod news;
pub mod request_params;
