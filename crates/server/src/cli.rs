use clap::Parser;

/// FreiFahren extraction and segment-risk server.
#[derive(Parser, Debug)]
#[command(name = "freifahren-server", about = "Ticket-inspector extraction and segment-risk server")]
pub struct CliArgs {
    /// Directory holding `lines.json`, `stations.json` and optionally
    /// `synonyms.json`.
    #[arg(long, env = "TOPOLOGY_DIR", default_value = "data/topology")]
    pub topology_dir: String,

    /// Number of workers draining the chat-ingestion queue.
    #[arg(long, env = "WORKER_COUNT", default_value = "4")]
    pub workers: usize,

    /// Capacity of the worker pool's inbound channel.
    #[arg(long, env = "WORKER_QUEUE_CAPACITY", default_value = "256")]
    pub queue_capacity: usize,

    /// Skip starting the chat long-poll loop (HTTP routes still serve).
    #[arg(long, env = "DISABLE_CHAT_INGRESS")]
    pub disable_chat_ingress: bool,
}
