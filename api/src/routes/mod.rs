pub mod generate_captions;
pub mod health_route;
pub mod process_batch;
pub mod search_sheet;
