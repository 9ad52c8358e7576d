
mod file_processor_tests;
