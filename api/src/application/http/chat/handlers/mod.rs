pub mod chat_socket;
