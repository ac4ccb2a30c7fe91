mod protocols;

pub use protocols::ProtocolSet;
