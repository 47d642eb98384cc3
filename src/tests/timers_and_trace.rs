use super::*;

#[test]
fn timer_queue_orders_by_due_time_then_insertion() {
    let mut queue = TimerQueue::new();
    let late = queue.schedule_timeout(Task::TypeNextChar, 50);
    let first = queue.schedule_timeout(Task::RotateRole, 10);
    let second = queue.schedule_timeout(Task::StartRoleRotation, 10);
    let clamped = queue.schedule_timeout(Task::TypeNextChar, -5);
    assert_eq!(clamped.due_at, 0);

    let order = std::iter::from_fn(|| queue.pop_next(None, true))
        .map(|task| task.id)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![clamped.id, first.id, second.id, late.id]);
    assert_eq!(queue.now_ms(), 50);
}

#[test]
fn timer_queue_respects_due_limit_and_requeues_intervals() {
    let mut queue = TimerQueue::new();
    let interval = queue.schedule_interval(Task::RotateRole, 30);
    assert!(queue.pop_next(Some(29), false).is_none());

    let Some(task) = queue.pop_next(Some(30), false) else {
        panic!("interval should be due at 30");
    };
    assert_eq!(queue.now_ms(), 0);
    let Some(requeued) = queue.requeue(task) else {
        panic!("interval should requeue");
    };
    assert_eq!(requeued.id, interval.id);
    assert_eq!(requeued.due_at, 60);
    assert_eq!(queue.len(), 1);

    assert_eq!(queue.clear(interval.id), 1);
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.describe_next(None), "none");
}

#[test]
fn pending_timers_show_page_schedule() -> Result<()> {
    let h = loaded_page()?;
    let pending = h
        .pending_timers()
        .into_iter()
        .map(|timer| (timer.label, timer.due_at, timer.interval_ms))
        .collect::<Vec<_>>();
    assert_eq!(
        pending,
        vec![
            ("reveal", 0, None),
            ("role_start", 1200, None),
            ("type_char", 1500, None),
        ]
    );
    Ok(())
}

#[test]
fn flush_stops_at_live_role_interval() -> Result<()> {
    let mut h = loaded_page()?;
    h.set_timer_step_limit(20)?;
    match h.flush() {
        Err(Error::Runtime(message)) => {
            assert!(message.contains("possible uncleared setInterval"));
            assert!(message.contains("limit=20"));
            assert!(message.contains("task=role_rotate"));
        }
        other => panic!("unexpected flush result: {other:?}"),
    }
    Ok(())
}

#[test]
fn flush_completes_once_interval_is_cleared() -> Result<()> {
    let mut h = loaded_page()?;
    h.advance_time_to(1200)?;
    let interval = h
        .pending_timers()
        .into_iter()
        .find(|timer| timer.interval_ms.is_some())
        .map(|timer| timer.id)
        .ok_or_else(|| Error::Runtime("role interval not scheduled".into()))?;
    assert!(h.clear_timer(interval));
    assert!(!h.clear_timer(interval));

    h.flush()?;
    h.assert_text(".hero-description", "Caf\u{e9}")?;
    assert!(h.pending_timers().is_empty());
    Ok(())
}

#[test]
fn run_next_timer_jumps_the_clock() -> Result<()> {
    let mut h = loaded_page()?;
    assert!(h.run_next_timer()?);
    assert_eq!(h.now_ms(), 0);
    assert!(h.run_next_timer()?);
    assert_eq!(h.now_ms(), 1200);
    h.assert_style("#role-1", "opacity", "1")?;

    assert_eq!(h.clear_all_timers(), 2);
    assert!(!h.run_next_timer()?);
    Ok(())
}

#[test]
fn clock_arguments_are_validated() -> Result<()> {
    let mut h = loaded_page()?;
    assert!(matches!(h.advance_time(-1), Err(Error::Runtime(_))));
    h.advance_time(10)?;
    assert!(matches!(h.advance_time_to(5), Err(Error::Runtime(_))));
    assert!(matches!(h.set_timer_step_limit(0), Err(Error::Runtime(_))));
    assert!(matches!(h.set_trace_log_limit(0), Err(Error::Runtime(_))));
    assert!(matches!(h.set_viewport(0.0, 720.0), Err(Error::Runtime(_))));
    assert_eq!(h.now_ms(), 10);
    Ok(())
}

#[test]
fn trace_records_events_timers_and_batches() -> Result<()> {
    let mut h = loaded_page()?;
    h.enable_trace(true);
    h.scroll_to(750.0)?;
    h.run_due_timers()?;
    let logs = h.take_trace_logs();

    assert!(logs.iter().any(|line| {
        line == "[event] done scroll target=window current=window listeners=4 default_prevented=false"
    }));
    assert!(logs.iter().any(|line| line == "[event] highlight scroll_y=750 active=#skills"));
    assert!(logs
        .iter()
        .any(|line| line == "[observer] batch entries=3 intersecting=3 scroll_y=750"));
    assert!(logs
        .iter()
        .any(|line| line == "[observer] entry target=#cat-2 intersecting=true ratio=1"));
    assert!(logs
        .iter()
        .any(|line| line.starts_with("[timer] schedule timeout") && line.contains("task=reveal")));
    assert!(logs.iter().any(|line| line == "[timer] run_due now_ms=0 ran=2"));
    assert!(h.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_categories_can_be_filtered_and_capped() -> Result<()> {
    let mut h = loaded_page()?;
    h.enable_trace(true);
    h.set_trace_events(false);
    h.set_trace_observer(false);
    h.scroll_to(750.0)?;
    h.advance_time(200)?;
    let logs = h.take_trace_logs();
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|line| line.starts_with("[timer]")));

    h.set_trace_log_limit(2)?;
    h.advance_time(1)?;
    h.advance_time(1)?;
    h.advance_time(1)?;
    let logs = h.take_trace_logs();
    assert_eq!(
        logs,
        vec![
            "[timer] advance delta_ms=1 from=201 to=202 ran_due=0".to_string(),
            "[timer] advance delta_ms=1 from=202 to=203 ran_due=0".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn trace_is_off_by_default() -> Result<()> {
    let mut h = loaded_page()?;
    h.scroll_to(750.0)?;
    assert!(h.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn lowering_trace_limit_keeps_newest_lines() -> Result<()> {
    let mut h = loaded_page()?;
    h.enable_trace(true);
    h.set_trace_log_limit(3)?;
    for _ in 0..5 {
        h.advance_time(1)?;
    }
    h.set_trace_log_limit(1)?;
    assert_eq!(
        h.take_trace_logs(),
        vec!["[timer] advance delta_ms=1 from=4 to=5 ran_due=0".to_string()]
    );

    h.advance_time(1)?;
    h.advance_time(1)?;
    assert_eq!(
        h.take_trace_logs(),
        vec!["[timer] advance delta_ms=1 from=6 to=7 ran_due=0".to_string()]
    );
    Ok(())
}
