//! URL state, its codec and the interaction events that mutate it.

pub mod state_codec;
pub mod url_state;
pub mod user_event;
