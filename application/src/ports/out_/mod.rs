mod messenger;

pub use messenger::{MessengerError, RoomMessenger};
