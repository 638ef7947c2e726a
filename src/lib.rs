//! quake-report: a list of recent earthquakes in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌────────────┐ post(job) ┌────────────┐ Outcome ┌──────────┐  draw()  ┌──────────┐
//! │ loader     │ ────────► │ Foreground │ ──────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread)   │ (channel) │ (main loop)│         │ (state)  │          │ (render) │
//! └────────────┘           └────────────┘         └──────────┘          └──────────┘
//!       ▲                                              ▲
//!       │ start() / cancel()                           │ handle_key_event()
//!       └──────────────────── main ◄──────────── ┌──────────┐
//!                                                │ input.rs │
//!                                                └──────────┘
//! ```
//!
//! * **`feed/`**: the `Earthquake` record, the `Fetcher` trait with its
//!   HTTP implementation, the GeoJSON parser, and the error types.
//! * **`loader/`**: the load-cycle state machine and the foreground queue
//!   its results are delivered through.
//! * **`app`**: the list the user is looking at, plus selection.
//! * **`ui`**: pure rendering: reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations and loader commands.
//! * **`config`**: command-line options.
//! * **`main`**: wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop (`src/main.rs`).

pub mod app;
pub mod config;
pub mod feed;
pub mod input;
pub mod loader;
pub mod ui;
