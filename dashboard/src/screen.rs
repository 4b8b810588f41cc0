use log::debug;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use common::types::Values;

use crate::chart::{magnitude, ChartSeries};
use crate::compass::Heading;
use crate::home::{HomeModel, HomeSnapshot};
use crate::presenter::Presenter;
use crate::state::Subscription;

/// Everything the home screen shows at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub readings: HomeSnapshot,
    pub heading: Heading,
    pub light_chart: Vec<f32>,
    pub acceleration_chart: Vec<f32>,
}

struct Charts {
    light: ChartSeries,
    acceleration: ChartSeries,
    charted_light: Option<f32>,
    charted_acceleration: Option<Values>,
}

impl Charts {
    fn new(capacity: usize) -> Self {
        Self {
            light: ChartSeries::new(capacity),
            acceleration: ChartSeries::new(capacity),
            charted_light: None,
            charted_acceleration: None,
        }
    }

    // a point is added whenever the charted value changes, the first one included
    fn update(&mut self, readings: &HomeSnapshot) {
        if self.charted_light != Some(readings.light) {
            self.light.push(readings.light);
            self.charted_light = Some(readings.light);
        }
        if self.charted_acceleration.as_ref() != Some(&readings.accelerometer) {
            self.acceleration.push(magnitude(&readings.accelerometer));
            self.charted_acceleration = Some(readings.accelerometer.clone());
        }
    }
}

/// One subscription per state, held while the screen is visible.
struct Subscriptions {
    light: Subscription<f32>,
    proximity: Subscription<f32>,
    accelerometer: Subscription<Values>,
    gyroscope: Subscription<Values>,
    pressure: Subscription<f32>,
    magnetometer: Subscription<Values>,
    ambient_temperature: Subscription<f32>,
    humidity: Subscription<f32>,
}

impl Subscriptions {
    fn new(model: &HomeModel) -> Self {
        Self {
            light: model.light.subscribe(),
            proximity: model.proximity.subscribe(),
            accelerometer: model.accelerometer.subscribe(),
            gyroscope: model.gyroscope.subscribe(),
            pressure: model.pressure.subscribe(),
            magnetometer: model.magnetometer.subscribe(),
            ambient_temperature: model.ambient_temperature.subscribe(),
            humidity: model.humidity.subscribe(),
        }
    }

    fn readings(&self) -> HomeSnapshot {
        HomeSnapshot {
            light: self.light.current(),
            proximity: self.proximity.current(),
            accelerometer: self.accelerometer.current(),
            gyroscope: self.gyroscope.current(),
            pressure: self.pressure.current(),
            magnetometer: self.magnetometer.current(),
            ambient_temperature: self.ambient_temperature.current(),
            humidity: self.humidity.current(),
        }
    }

    /// Waits until any state changes. False once the states are gone.
    async fn changed(&mut self) -> bool {
        tokio::select! {
            value = self.light.changed() => value.is_some(),
            value = self.proximity.changed() => value.is_some(),
            value = self.accelerometer.changed() => value.is_some(),
            value = self.gyroscope.changed() => value.is_some(),
            value = self.pressure.changed() => value.is_some(),
            value = self.magnetometer.changed() => value.is_some(),
            value = self.ambient_temperature.changed() => value.is_some(),
            value = self.humidity.changed() => value.is_some(),
        }
    }
}

/// Binds a [`HomeModel`] to a [`Presenter`] while the screen is visible.
pub struct HomeScreen<R: Presenter> {
    model: Arc<HomeModel>,
    presenter: Arc<R>,
    charts: Arc<Mutex<Charts>>,
    render: Option<JoinHandle<()>>,
}

impl<R: Presenter> HomeScreen<R> {
    pub fn new(model: Arc<HomeModel>, presenter: Arc<R>, chart_capacity: usize) -> Self {
        Self {
            model,
            presenter,
            charts: Arc::new(Mutex::new(Charts::new(chart_capacity))),
            render: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.render.is_some()
    }

    /// Subscribes to every state and renders a frame now and on every change.
    ///
    /// # Panics
    ///
    /// Outside the context of a tokio runtime.
    pub fn show(&mut self) {
        if self.render.is_some() {
            return;
        }
        let mut subscriptions = Subscriptions::new(&self.model);
        let presenter = self.presenter.clone();
        let charts = self.charts.clone();
        debug!("Home screen visible");

        self.render = Some(tokio::spawn(async move {
            loop {
                let frame = render_frame(&charts, subscriptions.readings());
                presenter.render(&frame).await;
                if !subscriptions.changed().await {
                    break;
                }
            }
        }));
    }

    /// Stops rendering and drops the subscriptions; sensors stop after their grace period.
    pub async fn hide(&mut self) {
        if let Some(render) = self.render.take() {
            render.abort();
            let _ = render.await;
            debug!("Home screen hidden");
        }
    }

    pub fn light_chart(&self) -> Vec<f32> {
        lock_charts(&self.charts).light.points()
    }

    pub fn acceleration_chart(&self) -> Vec<f32> {
        lock_charts(&self.charts).acceleration.points()
    }
}

impl<R: Presenter> Drop for HomeScreen<R> {
    fn drop(&mut self) {
        if let Some(render) = self.render.take() {
            render.abort();
        }
    }
}

fn lock_charts(charts: &Mutex<Charts>) -> MutexGuard<'_, Charts> {
    charts.lock().unwrap_or_else(PoisonError::into_inner)
}

fn render_frame(charts: &Mutex<Charts>, readings: HomeSnapshot) -> Frame {
    let mut charts = lock_charts(charts);
    charts.update(&readings);
    Frame {
        heading: Heading::from_magnetometer(&readings.magnetometer),
        light_chart: charts.light.points(),
        acceleration_chart: charts.acceleration.points(),
        readings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::home::Pipeline;
    use async_trait::async_trait;
    use common::constants::NOISE_THRESHOLD;
    use common::types::SensorKind;
    use sensor_flow::SensorSuite;
    use std::time::Duration;
    use test_utils::ScriptedPort;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(1);

    struct RecordingPresenter {
        frames: mpsc::UnboundedSender<Frame>,
    }

    #[async_trait]
    impl Presenter for RecordingPresenter {
        async fn render(&self, frame: &Frame) {
            let _ = self.frames.send(frame.clone());
        }
    }

    fn screen(
        port: Arc<ScriptedPort>,
    ) -> (
        HomeScreen<RecordingPresenter>,
        Arc<HomeModel>,
        mpsc::UnboundedReceiver<Frame>,
    ) {
        let suite = SensorSuite::new(port);
        let pipeline = Pipeline {
            noise_threshold: NOISE_THRESHOLD,
            smoothing_window: None,
            stop_timeout: Duration::from_millis(5000),
        };
        let model = Arc::new(HomeModel::new(&suite, pipeline));
        let (frames, receiver) = mpsc::unbounded_channel();
        let screen = HomeScreen::new(model.clone(), Arc::new(RecordingPresenter { frames }), 100);
        (screen, model, receiver)
    }

    async fn next_frame(frames: &mut mpsc::UnboundedReceiver<Frame>) -> Frame {
        timeout(WAIT, frames.recv()).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_show_renders_initial_frame() {
        let port = Arc::new(ScriptedPort::all());
        let (mut screen, _model, mut frames) = screen(port.clone());

        screen.show();
        assert!(screen.is_visible());
        let frame = next_frame(&mut frames).await;
        assert_eq!(frame.readings, HomeSnapshot {
            accelerometer: vec![0.0; 3],
            gyroscope: vec![0.0; 3],
            magnetometer: vec![0.0; 3],
            ..Default::default()
        });
        assert_eq!(frame.heading.direction, "N");
        assert_eq!(frame.light_chart, vec![0.0]);
        assert_eq!(frame.acceleration_chart, vec![0.0]);

        for kind in SensorKind::ALL {
            assert_eq!(port.active_registrations(kind), 1);
        }
    }

    #[tokio::test]
    async fn test_changes_update_frame_and_charts() {
        let port = Arc::new(ScriptedPort::all());
        let (mut screen, _model, mut frames) = screen(port.clone());
        screen.show();
        next_frame(&mut frames).await;

        port.emit(SensorKind::Light, vec![250.0]);
        let frame = next_frame(&mut frames).await;
        assert_eq!(frame.readings.light, 250.0);
        assert_eq!(frame.light_chart, vec![0.0, 250.0]);
        assert_eq!(frame.acceleration_chart, vec![0.0]);

        port.emit(SensorKind::Accelerometer, vec![3.0, 4.0, 0.0]);
        let frame = next_frame(&mut frames).await;
        assert_eq!(frame.acceleration_chart, vec![0.0, 5.0]);
        assert_eq!(frame.light_chart, vec![0.0, 250.0]);

        port.emit(SensorKind::Magnetometer, vec![30.0, 0.0, -40.0]);
        let frame = next_frame(&mut frames).await;
        assert_eq!(frame.heading.direction, "W");
        assert_eq!(screen.light_chart(), vec![0.0, 250.0]);
    }

    #[tokio::test]
    async fn test_hide_releases_subscriptions() {
        let port = Arc::new(ScriptedPort::all());
        let (mut screen, model, mut frames) = screen(port);
        screen.show();
        next_frame(&mut frames).await;
        assert_eq!(model.light.subscriber_count(), 1);

        screen.hide().await;
        assert!(!screen.is_visible());
        assert_eq!(model.light.subscriber_count(), 0);
        assert_eq!(model.humidity.subscriber_count(), 0);
        // still collecting during the grace period
        assert!(model.light.is_collecting());
    }
}
