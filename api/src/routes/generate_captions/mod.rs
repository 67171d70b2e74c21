pub mod generate_captions_request;
pub mod generate_captions_response;
pub mod generate_captions_route;
