pub mod config;
pub mod logging;

pub mod capture;
pub mod document;
pub mod downloader;
pub mod page_source;
pub mod path_map;
pub mod storage;
pub mod url_model;
