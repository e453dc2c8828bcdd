mod authentication;
mod cart;
mod protocol;
mod registry;
