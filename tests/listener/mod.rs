mod dead_endpoint;
mod disconnect;
mod registration;
