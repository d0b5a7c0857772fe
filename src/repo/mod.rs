//! All SQL lives here, one module per entity. Handlers never assemble
//! statements themselves; the booking lifecycle invariants are encoded in
//! [`bookings`] and nowhere else.

pub mod bookings;
pub mod customers;
pub mod services;
pub mod staff_members;
pub mod users;
