mod listener;

pub use listener::ListenerInterface;
