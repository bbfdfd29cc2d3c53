use super::*;

fn frame(width: u32, height: u32) -> FrameRgb {
    FrameRgb {
        width,
        height,
        data: vec![0; (width * height * 3) as usize],
    }
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(4).unwrap(),
    }
}

#[test]
fn records_frames_and_calls() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2, 2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg(2, 2)));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!((sink.begin_calls(), sink.end_calls()), (1, 1));
}

#[test]
fn rejects_push_before_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(1, 1)).is_err());
}

#[test]
fn rejects_out_of_order_and_wrong_size() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &frame(2, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(2, 2)).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame(2, 2)).is_err());
    assert!(sink.push_frame(FrameIndex(4), &frame(2, 3)).is_err());
    assert_eq!(sink.frames().len(), 1);
}
