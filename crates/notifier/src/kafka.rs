//! Kafka-backed notifier.
//!
//! Uses rdkafka, so any Kafka-compatible broker works (Apache Kafka,
//! Redpanda, MSK). Each event is written as a JSON message keyed by order ID,
//! which keeps all events for one order on one partition and therefore in
//! order.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::{EventNotifier, NotifyError, OrderStatusChanged, Result};

/// Connection settings for [`KafkaNotifier`].
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated bootstrap servers.
    pub brokers: String,
    /// Topic that receives status-change events.
    pub topic: String,
    /// Upper bound on how long a single delivery may take.
    pub message_timeout: Duration,
}

impl KafkaConfig {
    /// Creates a config with the default 5 second delivery timeout.
    pub fn new(brokers: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: topic.into(),
            message_timeout: Duration::from_secs(5),
        }
    }
}

/// Publishes order events to a Kafka topic.
pub struct KafkaNotifier {
    producer: FutureProducer,
    config: KafkaConfig,
}

impl KafkaNotifier {
    /// Creates a producer for the configured brokers.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Kafka`] if the client configuration is rejected.
    pub fn new(config: KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set(
                "message.timeout.ms",
                config.message_timeout.as_millis().to_string(),
            )
            .set("acks", "1")
            .create()?;

        Ok(Self { producer, config })
    }

    /// Returns the topic events are published to.
    pub fn topic(&self) -> &str {
        &self.config.topic
    }

    /// Creates the topic with one partition and replication factor 1 if it
    /// does not exist yet.
    ///
    /// Failures (including "already exists") are logged and otherwise
    /// ignored; publishing still works against brokers that auto-create
    /// topics.
    pub async fn ensure_topic(&self) {
        let admin: AdminClient<DefaultClientContext> = match ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .create()
        {
            Ok(admin) => admin,
            Err(e) => {
                tracing::error!(error = %e, "failed to create Kafka admin client");
                return;
            }
        };

        let topic = NewTopic::new(&self.config.topic, 1, TopicReplication::Fixed(1));
        let options = AdminOptions::new().request_timeout(Some(self.config.message_timeout));
        match admin.create_topics(&[topic], &options).await {
            Ok(results) => {
                for result in results {
                    match result {
                        Ok(name) => tracing::info!(topic = %name, "topic created"),
                        Err((name, code)) => {
                            tracing::info!(topic = %name, ?code, "topic not created")
                        }
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to create topic"),
        }
    }
}

#[async_trait]
impl EventNotifier for KafkaNotifier {
    async fn publish(&self, event: &OrderStatusChanged) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        let record = FutureRecord::to(&self.config.topic)
            .key(event.key())
            .payload(&payload);

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(self.config.message_timeout))
            .await
            .map_err(|(e, _)| NotifyError::Kafka(e))?;

        tracing::debug!(
            topic = %self.config.topic,
            order_id = %event.order_id,
            old_status = %event.old_status,
            new_status = %event.new_status,
            partition,
            offset,
            "event published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_five_second_timeout() {
        let config = KafkaConfig::new("localhost:9092", "order_events");
        assert_eq!(config.brokers, "localhost:9092");
        assert_eq!(config.topic, "order_events");
        assert_eq!(config.message_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn producer_is_created_without_contacting_brokers() {
        let notifier =
            KafkaNotifier::new(KafkaConfig::new("127.0.0.1:1", "order_events")).unwrap();
        assert_eq!(notifier.topic(), "order_events");
    }
}
