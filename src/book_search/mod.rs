//! 书目搜索：Open Library 客户端、数据模型、HTML 渲染与搜索控制器。

pub mod client;
pub mod controller;
pub mod html_utils;
pub mod models;
pub mod render;

pub use client::{OpenLibraryClient, SearchBackend, SearchError};
pub use controller::{ListView, ResultsClick, SearchController, SearchView, UiState};
pub use models::{BookRecord, SearchQuery, SearchResponse};
