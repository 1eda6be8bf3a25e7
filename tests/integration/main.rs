mod helpers;
mod history_flow;
mod tracked_output;
