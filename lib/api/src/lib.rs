//! # featurefit API
//!
//! HTTP surface over a loaded [`Session`](featurefit_inference::Session).
//!
//! | Method | Path       | Purpose                                         |
//! |--------|------------|-------------------------------------------------|
//! | GET    | `/health`  | liveness                                        |
//! | GET    | `/schema`  | expected columns, group choices, ordinal labels |
//! | POST   | `/predict` | raw form values in, prediction result out       |
//! | POST   | `/reconcile` | raw form values in, assembled column row out  |

pub mod rest;

pub use rest::RestApi;
