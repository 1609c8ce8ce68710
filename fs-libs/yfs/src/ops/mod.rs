//! The filesystem operations served to clients.

mod create;
mod dir;
mod io;
mod link;
mod lookup;
mod sync;
