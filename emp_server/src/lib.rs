//! # Event marketplace server
//! This module hosts the HTTP server for the event marketplace. It is responsible for:
//! * Registering coordinators and vendors, and recording the services vendors offer.
//! * Accepting event creation requests from coordinators, which kicks off the vendor bid fan-out.
//! * Reporting on events, their bids, and the state of the coordinator's payment.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/users`, `GET /api/users/{user_id}`: Register and look up users.
//! * `PUT /api/vendors/{vendor_id}`, `GET /api/vendors/{vendor_id}`: Set and read the services a vendor offers.
//! * `POST /api/events`: Create an event and ask matching vendors to bid on it.
//! * `GET /api/events`, `GET /api/events/upcoming`: Paid events, and the next few paid events from today.
//! * `POST /api/events/search`: Find events by text (title or location) and city.
//! * `PUT /api/events/{event_id}`: Change an event's title, description, date, city or location.
//! * `GET /api/events/{event_id}`, `GET /api/events/{event_id}/bids`: Read an event and its bids.
//! * `GET /api/events/{event_id}/payment`, `POST /api/events/{event_id}/payment/retry`: Payment follow-up.
//! * `GET /api/coordinators/{coordinator_id}/events`: All events for a coordinator.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
