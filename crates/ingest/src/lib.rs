//! Market event ingestion
//!
//! One [`MarketEventProcessor`] per configured market consumes that market's
//! event partition, converts fixed-point quantities to decimal text, and
//! emits structured records through a [`RecordSink`]. The
//! [`ProcessorSupervisor`] launches the processors under a shared shutdown
//! token; [`OrderGateway`] is the outbound path turning validated requests
//! into published order commands.

pub mod processor;
pub mod publish;
pub mod record;
pub mod shutdown;
pub mod supervisor;

pub use processor::{event_topic, ConsumerCursor, MarketEventProcessor, ProcessorState};
pub use publish::{command_topic, CancelRequest, OrderGateway, OrderRequest, PublishError};
pub use record::{
    MemorySink, OrderErrorRecord, OrderRecord, ProcessedRecord, RecordSink, TracingSink,
    TradeRecord,
};
pub use shutdown::ShutdownController;
pub use supervisor::ProcessorSupervisor;
