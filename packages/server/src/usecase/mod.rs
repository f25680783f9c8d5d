//! UseCase layer: one struct per application operation.

pub mod error;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod notify_room;
pub mod send_message;

pub use error::{GetRoomDetailError, NotifyRoomError, SendMessageError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use leave_room::LeaveRoomUseCase;
pub use notify_room::NotifyRoomUseCase;
pub use send_message::{SEND_FAILURE_NOTICE, SendMessageUseCase};
