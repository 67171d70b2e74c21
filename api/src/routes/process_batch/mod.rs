pub mod process_batch_request;
pub mod process_batch_response;
pub mod process_batch_route;
