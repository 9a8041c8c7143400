pub mod relay_error;
