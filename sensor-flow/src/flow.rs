use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use log::debug;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use uuid::Uuid;

use common::types::Values;
use publisher::Listener;

use crate::errors::SensorError;
use crate::sensor::MeasurableSensor;

/// Stream of readings from one sensor.
///
/// 1. Opening the flow registers a value listener and starts the sensor.
/// 2. Dropping the flow unregisters the listener and stops the sensor.
/// 3. Readings are conflated: if the consumer is slower than the sensor, only the most
///    recent unconsumed reading is kept and the older ones are discarded.
pub struct SensorFlow {
    inner: BoxStream<'static, Values>,
    guard: FlowGuard,
}

struct FlowGuard {
    sensor: Arc<dyn MeasurableSensor>,
    listener_id: Uuid,
}

impl Drop for FlowGuard {
    fn drop(&mut self) {
        self.sensor.unregister_value_listener(self.listener_id);
        self.sensor.stop_listening();
        debug!("{} flow closed", self.sensor.kind());
    }
}

/// Opens a [`SensorFlow`] over `sensor`.
///
/// A sensor missing on the device yields a flow that never produces a reading.
pub fn sensor_flow(sensor: Arc<dyn MeasurableSensor>) -> Result<SensorFlow, SensorError> {
    let (sender, receiver) = watch::channel::<Option<Arc<Values>>>(None);
    let mut listener = Listener::new(move |_id: Uuid, values: Arc<Values>| {
        // replaces any reading the consumer has not picked up yet
        sender.send_replace(Some(values));
    });
    let listener_id = sensor.register_value_listener(&mut listener);

    if let Err(e) = sensor.start_listening() {
        sensor.unregister_value_listener(listener_id);
        return Err(e);
    }
    debug!("{} flow opened", sensor.kind());

    let inner = stream::unfold(receiver, |mut receiver| async move {
        loop {
            receiver.changed().await.ok()?;
            let latest = receiver.borrow_and_update().clone();
            if let Some(values) = latest {
                return Some(((*values).clone(), receiver));
            }
        }
    })
    .boxed();

    Ok(SensorFlow {
        inner,
        guard: FlowGuard {
            sensor,
            listener_id,
        },
    })
}

impl SensorFlow {
    pub fn kind(&self) -> common::types::SensorKind {
        self.guard.sensor.kind()
    }
}

impl Stream for SensorFlow {
    type Item = Values;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_next_unpin(cx)
    }
}
