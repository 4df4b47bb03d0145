//! movielog — a session-authenticated movie manager.
//!
//! Registered users keep a shared catalogue of movies; every record belongs
//! to the user who created it, and only that user can change or remove it.
//! Handlers answer with either a redirect or a render instruction (template
//! name plus JSON context) for the presentation layer.
//!
//! | Route                       | Access        | Module               |
//! |-----------------------------|---------------|----------------------|
//! | `/auth/register`, `/auth/login`, `/auth/logout` | public | [`auth`] |
//! | `/movies`, `/movies/:id`    | public        | [`movies`]           |
//! | `/movies/add`               | signed in     | [`movies`]           |
//! | `/movies/edit/:id`, `/movies/delete/:id` | owner only | [`movies`] |

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod movies;
pub mod session;
pub mod state;
pub mod store;
pub mod view;
