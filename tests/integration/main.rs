mod conversation_flow;
mod helpers;
mod scroll_follow;
