pub mod search_sheet_request;
pub mod search_sheet_response;
pub mod search_sheet_route;
