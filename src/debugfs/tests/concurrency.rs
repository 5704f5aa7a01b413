use super::*;

/// 两个并发写者分别写不同的下发属性, 检验硬件窗口不交错:
/// 事件序列中每个 wake 必须先于配对的 sleep 关闭, 期间只允许
/// 本次写入的 push, 不允许嵌套的第二个 wake。
#[test]
fn test_concurrent_writers_do_not_interleave_hw_windows() {
    let rig = create_test_rig();
    rig.power_on_asleep();

    let frag = rig.debugfs.lookup_path("tx_frag_thld").unwrap();
    let auth = rig.debugfs.lookup_path("sleep_auth").unwrap();

    let t1 = std::thread::spawn(move || {
        for i in 0..100u32 {
            frag.write(&format!("{}", 1000 + i)).unwrap();
        }
    });
    let t2 = std::thread::spawn(move || {
        for i in 0..100u32 {
            auth.write(&format!("{}", i % 3)).unwrap();
        }
    });
    t1.join().unwrap();
    t2.join().unwrap();

    let mut in_window = false;
    for event in rig.events() {
        match event {
            Event::Wake => {
                assert!(!in_window, "nested wake");
                in_window = true;
            }
            Event::Sleep => {
                assert!(in_window, "sleep without wake");
                in_window = false;
            }
            Event::Push(..) => assert!(in_window, "push outside wake window"),
            _ => {}
        }
    }
    assert!(!in_window);

    let pushes = rig
        .events()
        .iter()
        .filter(|e| matches!(e, Event::Push(..)))
        .count();
    assert_eq!(pushes, 200);
}

/// 统计刷新与配置写者共享同一把锁, 刷新窗口同样不与下发窗口交错
#[test]
fn test_refresh_and_writer_are_mutually_exclusive() {
    let rig = create_test_rig();
    rig.power_on_asleep();

    let ctx = rig.ctx.clone();
    let clock = rig.clock.clone();
    let reader = std::thread::spawn(move || {
        for _ in 0..50 {
            clock.fetch_add(crate::ctx::STATS_LIFETIME, Ordering::SeqCst);
            let _ = ctx.update_stats();
        }
    });

    let frag = rig.debugfs.lookup_path("tx_frag_thld").unwrap();
    let writer = std::thread::spawn(move || {
        for i in 0..50u32 {
            frag.write(&format!("{}", 2000 + i)).unwrap();
        }
    });

    reader.join().unwrap();
    writer.join().unwrap();

    let mut in_window = false;
    for event in rig.events() {
        match event {
            Event::Wake => {
                assert!(!in_window);
                in_window = true;
            }
            Event::Sleep => {
                assert!(in_window);
                in_window = false;
            }
            Event::ReadCounters | Event::Push(..) => assert!(in_window),
            _ => {}
        }
    }
    assert!(!in_window);
}
