//! Chat relay server for pay-per-view event rooms.
//!
//! Clients connect to `ws://{host}:{port}/ws/{room_id}/{token}`, receive the
//! room history, and every message they send is persisted through the backend
//! and broadcast to the room.
//!
//! Run with:
//! ```not_rust
//! BACKEND_SERVER=https://api.example.com/api cargo run --bin ppvchat-server
//! cargo run --bin ppvchat-server -- --port 3001 --backend-url http://localhost:9000/api
//! ```

use std::{sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use ppvchat_server::{
    domain::{BroadcastFormat, MessagePusher, MessageStore, RoomRegistry},
    infrastructure::{
        backend::{BackendConfig, HttpMessageStore},
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryRoomRegistry,
    },
    ui::Server,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        NotifyRoomUseCase, SendMessageUseCase,
    },
};
use ppvchat_shared::logger::setup_logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Broadcast the message text unchanged
    Raw,
    /// Broadcast "Message from {room_id}: {text}"
    Labelled,
}

impl From<FormatArg> for BroadcastFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Raw => BroadcastFormat::Raw,
            FormatArg::Labelled => BroadcastFormat::Labelled,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ppvchat-server")]
#[command(about = "WebSocket chat relay for pay-per-view event rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Base URL of the message store API (e.g. https://api.example.com/api)
    #[arg(long, env = "BACKEND_SERVER")]
    backend_url: String,

    /// Timeout for each message store request, in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value = "30")]
    backend_timeout_secs: u64,

    /// How accepted messages are rendered for the room
    #[arg(long, env = "BROADCAST_FORMAT", value_enum, default_value = "raw")]
    broadcast_format: FormatArg,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessageStore
    // 3. MessagePusher
    // 4. UseCases
    // 5. Server

    // 1. Create Registry (in-memory, process-wide)
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create MessageStore (remote REST API)
    let backend_config = BackendConfig::new(
        args.backend_url,
        Duration::from_secs(args.backend_timeout_secs),
    );
    let message_store: Arc<dyn MessageStore> = match HttpMessageStore::new(backend_config) {
        Ok(store) => {
            tracing::info!("Using message store {:?}", store);
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Invalid message store configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Create MessagePusher (WebSocket implementation)
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

    // 4. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_store.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        message_store.clone(),
        message_pusher.clone(),
        args.broadcast_format.into(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone()));
    let notify_room_usecase = Arc::new(NotifyRoomUseCase::new(
        registry.clone(),
        message_store.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry.clone()));

    // 5. Create and run the server
    let server = Server::new(
        join_room_usecase,
        send_message_usecase,
        leave_room_usecase,
        notify_room_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
