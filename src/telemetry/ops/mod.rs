pub mod classify;
pub mod scan;
pub mod sites;
pub mod current;
pub mod serve;
pub mod extract;
pub mod controller;
