mod helpers;
mod search_flow;
