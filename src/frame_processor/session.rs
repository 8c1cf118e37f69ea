// SPDX-License-Identifier: GPL-3.0-only

//! Per-tick orchestration
//!
//! A session owns a frame source, a detector and whatever state has to
//! survive between ticks. Each `tick()` pulls at most one frame and always
//! returns a [`TickOutcome`]; failures are logged and reported, never raised.

use super::crop::crop_frame;
use super::tasks::{
    MarkerDetector, PlacementContext, TargetRegistry, assign_markers_to_targets,
    resolve_calibration_region,
};
use super::types::{Assignment, CalibrationUpdate, TickError, TickOutcome};
use crate::backends::camera::{CameraFrame, FrameSource};
use crate::constants::timing::TICK_LOG_INTERVAL;
use crate::geometry::{CalibrationRegion, Dimensions, ViewportProjector};
use tracing::{debug, info, warn};

/// Pull one frame, turning "nothing new" into `Ok(None)`
fn acquire<S: FrameSource>(source: &mut S) -> Result<Option<CameraFrame>, TickError> {
    Ok(source.next_frame()?)
}

/// Log a failed tick and wrap it
fn failed<T>(kind: &str, error: TickError) -> TickOutcome<T> {
    warn!(session = kind, error = %error, "Tick failed");
    TickOutcome::Failed(error)
}

/// Moves the calibration region to the "1"/"2" corner markers
pub struct CalibrationSession<S, D> {
    source: S,
    detector: D,
    display: Dimensions,
    region: CalibrationRegion,
    top_left_seen: bool,
    bottom_right_seen: bool,
    ticks: u64,
}

impl<S: FrameSource, D: MarkerDetector> CalibrationSession<S, D> {
    pub fn new(source: S, detector: D, display: Dimensions, region: CalibrationRegion) -> Self {
        Self {
            source,
            detector,
            display,
            region,
            top_left_seen: false,
            bottom_right_seen: false,
            ticks: 0,
        }
    }

    /// Current region
    pub fn region(&self) -> CalibrationRegion {
        self.region
    }

    pub fn display(&self) -> Dimensions {
        self.display
    }

    /// Corners seen so far, written over `base`
    ///
    /// Only corners whose marker was decoded at least once are taken from
    /// this session; the other corner keeps its value from `base`. `None`
    /// when neither marker was ever seen.
    pub fn confirmed_region(&self, base: CalibrationRegion) -> Option<CalibrationRegion> {
        if !self.top_left_seen && !self.bottom_right_seen {
            return None;
        }

        let mut region = base;
        if self.top_left_seen {
            region.top_left = self.region.top_left;
        }
        if self.bottom_right_seen {
            region.bottom_right = self.region.bottom_right;
        }
        Some(region)
    }

    pub fn tick(&mut self) -> TickOutcome<CalibrationUpdate> {
        self.ticks += 1;
        match self.try_tick() {
            Ok(outcome) => outcome,
            Err(e) => failed("calibration", e),
        }
    }

    fn try_tick(&mut self) -> Result<TickOutcome<CalibrationUpdate>, TickError> {
        let Some(frame) = acquire(&mut self.source)? else {
            return Ok(TickOutcome::NoFrame);
        };

        let markers = self.detector.detect(&frame)?;
        if markers.is_empty() {
            return Ok(TickOutcome::NoMarkers);
        }

        // Resolve into a copy so a failed batch leaves the region as it was
        let mut region = self.region;
        let update =
            resolve_calibration_region(&markers, frame.dimensions(), self.display, &mut region)?;
        self.region = region;
        self.top_left_seen |= update.top_left;
        self.bottom_right_seen |= update.bottom_right;

        if update.changed() {
            info!(
                top_left = ?self.region.top_left,
                bottom_right = ?self.region.bottom_right,
                "Calibration region updated"
            );
        } else if self.ticks % TICK_LOG_INTERVAL == 0 {
            debug!(markers = markers.len(), "No calibration markers in view");
        }

        Ok(TickOutcome::Processed(update))
    }
}

/// Places targets from markers found inside the calibration region
pub struct TrackingSession<S, D> {
    source: S,
    detector: D,
    display: Dimensions,
    region: CalibrationRegion,
    registry: TargetRegistry,
    projector: Box<dyn ViewportProjector>,
    ticks: u64,
}

impl<S: FrameSource, D: MarkerDetector> TrackingSession<S, D> {
    pub fn new(
        source: S,
        detector: D,
        display: Dimensions,
        region: CalibrationRegion,
        registry: TargetRegistry,
        projector: Box<dyn ViewportProjector>,
    ) -> Self {
        Self {
            source,
            detector,
            display,
            region,
            registry,
            projector,
            ticks: 0,
        }
    }

    pub fn region(&self) -> CalibrationRegion {
        self.region
    }

    /// Targets with the placements of the last successful ticks
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn tick(&mut self) -> TickOutcome<Assignment> {
        self.ticks += 1;
        match self.try_tick() {
            Ok(outcome) => outcome,
            Err(e) => failed("tracking", e),
        }
    }

    fn try_tick(&mut self) -> Result<TickOutcome<Assignment>, TickError> {
        let Some(frame) = acquire(&mut self.source)? else {
            return Ok(TickOutcome::NoFrame);
        };

        let cropped = crop_frame(&frame, &self.region, self.display)?;
        let markers = self.detector.detect(&cropped)?;
        if markers.is_empty() {
            return Ok(TickOutcome::NoMarkers);
        }

        let assignment = {
            let context = PlacementContext {
                frame: cropped.dimensions(),
                display: self.display,
                projector: self.projector.as_ref(),
            };
            assign_markers_to_targets(&markers, &self.registry.names(), &context)?
        };
        self.registry.apply(&assignment.placements);

        if self.ticks % TICK_LOG_INTERVAL == 0 {
            info!(
                placed = assignment.placements.len(),
                skipped = assignment.skipped.len(),
                crop = %cropped.dimensions(),
                "Tracking"
            );
        }

        Ok(TickOutcome::Processed(assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{BackendError, BackendResult};
    use crate::errors::DetectionError;
    use crate::frame_processor::types::DetectedMarker;
    use crate::geometry::DisplayProjector;
    use glam::{DVec2, DVec3};
    use std::collections::VecDeque;

    /// Replays a scripted list of source results
    struct ScriptedSource(VecDeque<BackendResult<Option<CameraFrame>>>);

    impl FrameSource for ScriptedSource {
        fn name(&self) -> String {
            "scripted".to_string()
        }

        fn next_frame(&mut self) -> BackendResult<Option<CameraFrame>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    type ScriptedResult = Result<Vec<DetectedMarker>, DetectionError>;

    /// Returns scripted detections regardless of the frame
    struct ScriptedDetector(std::cell::RefCell<VecDeque<ScriptedResult>>);

    impl ScriptedDetector {
        fn new(results: Vec<ScriptedResult>) -> Self {
            Self(std::cell::RefCell::new(results.into()))
        }
    }

    impl MarkerDetector for ScriptedDetector {
        fn detect(&self, _frame: &CameraFrame) -> Result<Vec<DetectedMarker>, DetectionError> {
            self.0.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    fn frame(width: u32, height: u32) -> BackendResult<Option<CameraFrame>> {
        Ok(Some(CameraFrame::from_rgba(
            width,
            height,
            vec![0; (width * height * 4) as usize],
            0,
        )))
    }

    fn source(frames: Vec<BackendResult<Option<CameraFrame>>>) -> ScriptedSource {
        ScriptedSource(frames.into())
    }

    fn marker(id: &str, points: &[(f64, f64)]) -> DetectedMarker {
        DetectedMarker::new(id, points.iter().map(|&(x, y)| DVec2::new(x, y)).collect())
    }

    #[test]
    fn test_calibration_moves_top_left_only() {
        let start = CalibrationRegion::calibration_default();
        let detector = ScriptedDetector::new(vec![Ok(vec![marker(
            "1",
            &[(10.0, 10.0), (20.0, 10.0), (20.0, 30.0)],
        )])]);
        let mut session = CalibrationSession::new(
            source(vec![frame(1920, 1080)]),
            detector,
            Dimensions::new(1920, 1080),
            start,
        );

        let outcome = session.tick();

        let update = outcome.processed().unwrap();
        assert!(update.top_left && !update.bottom_right);
        assert_eq!(session.region().top_left, DVec2::new(10.0, 10.0));
        assert_eq!(session.region().bottom_right, start.bottom_right);
    }

    #[test]
    fn test_calibration_reports_missing_frames_and_markers() {
        let mut session = CalibrationSession::new(
            source(vec![Ok(None), frame(8, 8)]),
            ScriptedDetector::new(vec![Ok(Vec::new())]),
            Dimensions::new(8, 8),
            CalibrationRegion::calibration_default(),
        );

        assert_eq!(session.tick(), TickOutcome::NoFrame);
        assert_eq!(session.tick(), TickOutcome::NoMarkers);
    }

    #[test]
    fn test_confirmed_region_needs_a_marker() {
        let mut session = CalibrationSession::new(
            source(vec![frame(8, 8), frame(8, 8)]),
            ScriptedDetector::new(vec![Ok(Vec::new()), Ok(vec![marker("7", &[(1.0, 1.0)])])]),
            Dimensions::new(8, 8),
            CalibrationRegion::calibration_default(),
        );

        session.tick();
        session.tick();

        assert_eq!(session.confirmed_region(CalibrationRegion::tracking_default()), None);
    }

    #[test]
    fn test_confirmed_region_keeps_unseen_corner() {
        let display = Dimensions::new(1920, 1080);
        let mut session = CalibrationSession::new(
            source(vec![frame(1920, 1080)]),
            ScriptedDetector::new(vec![Ok(vec![marker("1", &[(40.0, 20.0)])])]),
            display,
            CalibrationRegion::calibration_default(),
        );

        session.tick();

        let base = CalibrationRegion::tracking_default();
        let region = session.confirmed_region(base).unwrap();
        assert_eq!(region.top_left, DVec2::new(40.0, 20.0));
        assert_eq!(region.bottom_right, base.bottom_right);
    }

    #[test]
    fn test_confirmed_region_remembers_earlier_ticks() {
        let mut session = CalibrationSession::new(
            source(vec![frame(100, 100), frame(100, 100)]),
            ScriptedDetector::new(vec![
                Ok(vec![marker("2", &[(90.0, 80.0)])]),
                Ok(vec![marker("1", &[(10.0, 5.0)])]),
            ]),
            Dimensions::new(100, 100),
            CalibrationRegion::calibration_default(),
        );

        session.tick();
        session.tick();

        let region = session
            .confirmed_region(CalibrationRegion::tracking_default())
            .unwrap();
        assert_eq!(region.top_left, DVec2::new(10.0, 5.0));
        assert_eq!(region.bottom_right, DVec2::new(90.0, 80.0));
    }

    #[test]
    fn test_source_error_fails_tick() {
        let mut session = CalibrationSession::new(
            source(vec![Err(BackendError::CaptureFailed("gone".to_string()))]),
            ScriptedDetector::new(Vec::new()),
            Dimensions::new(8, 8),
            CalibrationRegion::calibration_default(),
        );

        assert_eq!(
            session.tick(),
            TickOutcome::Failed(TickError::Source(BackendError::CaptureFailed("gone".to_string())))
        );
    }

    fn tracking(
        frames: Vec<BackendResult<Option<CameraFrame>>>,
        detections: Vec<Result<Vec<DetectedMarker>, DetectionError>>,
        region: CalibrationRegion,
    ) -> TrackingSession<ScriptedSource, ScriptedDetector> {
        TrackingSession::new(
            source(frames),
            ScriptedDetector::new(detections),
            Dimensions::new(200, 100),
            region,
            TargetRegistry::new(["a", "b"]),
            Box::new(DisplayProjector),
        )
    }

    fn full_region() -> CalibrationRegion {
        CalibrationRegion::new(DVec2::ZERO, DVec2::new(200.0, 100.0))
    }

    #[test]
    fn test_tracking_places_targets() {
        let mut session = tracking(
            vec![frame(200, 100)],
            vec![Ok(vec![marker("2", &[(50.0, 25.0), (50.0, 20.0), (80.0, 30.0)])])],
            full_region(),
        );

        let outcome = session.tick();

        assert_eq!(outcome.processed().unwrap().placements.len(), 1);
        let target = session.registry().get(1).unwrap();
        assert_eq!(target.position, Some(DVec3::new(50.0, 75.0, 0.0)));
        assert!(target.rotation.is_some());
        assert_eq!(session.registry().get(0).unwrap().position, None);
    }

    #[test]
    fn test_failed_tick_keeps_previous_placements() {
        let mut session = tracking(
            vec![frame(200, 100), frame(200, 100)],
            vec![
                Ok(vec![marker("1", &[(10.0, 10.0), (10.0, 5.0), (40.0, 15.0)])]),
                Err(DetectionError::DecoderFailed("boom".to_string())),
            ],
            full_region(),
        );

        assert!(session.tick().processed().is_some());
        let before = session.registry().clone();

        assert!(session.tick().is_failed());
        assert_eq!(session.registry(), &before);
    }

    #[test]
    fn test_region_outside_frame_fails_tick() {
        let region = CalibrationRegion::new(DVec2::new(500.0, 500.0), DVec2::new(600.0, 600.0));
        let mut session = tracking(vec![frame(200, 100)], Vec::new(), region);

        assert_eq!(
            session.tick(),
            TickOutcome::Failed(TickError::Detection(DetectionError::EmptyCrop))
        );
    }
}
