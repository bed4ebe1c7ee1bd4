// Domain model for URI template parameter contracts

pub mod template;
