#[cfg(test)]
mod tests {
    use firebot::hardware::{MotorId, ReplayEvent, SharedLog};
    use firebot::{BehaviorMachine, FirebotConfig, NavigationContext, ReplayScript, RobotState};
    use rstest::rstest;

    // Wires a machine with default calibration onto a scripted robot
    fn machine(script: ReplayScript) -> (BehaviorMachine, SharedLog) {
        let (robot, log) = script.build();
        (BehaviorMachine::new(robot, FirebotConfig::default()), log)
    }

    fn distances(values: &[f32]) -> Vec<Option<f32>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn start_button_launches_the_search() {
        let (mut machine, log) = machine(ReplayScript {
            start_button: vec![false, true],
            left_distance: distances(&[60.0]),
            line: vec![40, 900],
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::Idle, NavigationContext::default());

        assert_eq!(next, RobotState::FollowRightWall);
        assert_eq!(ctx, NavigationContext::new_run());
        let log = log.borrow();
        // Idle stops first, then full power out of the circle
        assert_eq!(log.events[0], ReplayEvent::Stop(MotorId::Left));
        assert_eq!(log.drive_commands(), vec![(16, 16)]);
        assert_eq!(log.display_line(0), Some("NAV RIGHT"));
    }

    #[test]
    fn idle_shows_flame_data_while_waiting() {
        let (robot, log) = ReplayScript {
            flame: vec![2],
            flame_intensity: vec![412],
            ..ReplayScript::default()
        }
        .build();
        let mut config = FirebotConfig::default();
        config.polling.max_iterations = Some(4);
        let mut machine = BehaviorMachine::new(robot, config);

        let (next, ctx) = machine.tick(RobotState::Idle, NavigationContext::default());

        assert_eq!(next, RobotState::Idle);
        assert_eq!(ctx, NavigationContext::default());
        let log = log.borrow();
        assert_eq!(log.display_line(1), Some("V:412(300) D:2"));
        assert_eq!(log.display_line(0), Some("WAIT"));
    }

    #[test]
    fn right_wall_too_far_steers_toward_it() {
        let (mut machine, log) = machine(ReplayScript {
            front_distance: distances(&[80.0]),
            right_distance: distances(&[30.0]),
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        assert_eq!(next, RobotState::FollowRightWall);
        assert_eq!(log.borrow().drive_commands(), vec![(14, 4)]);
    }

    #[test]
    fn blocked_front_turns_left_before_following() {
        let (mut machine, log) = machine(ReplayScript {
            front_distance: distances(&[10.0]),
            right_distance: distances(&[16.0]),
            ..ReplayScript::default()
        });

        machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(-5, 5), (9, 9)]);
        assert!(log.sleeps().contains(&675));
    }

    #[test]
    fn both_bumpers_back_straight_off() {
        let (mut machine, log) = machine(ReplayScript {
            left_bumper: vec![true],
            right_bumper: vec![true],
            right_distance: distances(&[16.0]),
            ..ReplayScript::default()
        });

        machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(-9, -9), (9, 9)]);
        assert!(log.sleeps().contains(&1000));
    }

    #[rstest]
    #[case(true, false, (-4, -14))]
    #[case(false, true, (-14, -4))]
    fn single_bumper_swerves_away(
        #[case] left: bool,
        #[case] right: bool,
        #[case] expected: (i32, i32),
    ) {
        let (mut machine, log) = machine(ReplayScript {
            left_bumper: vec![left],
            right_bumper: vec![right],
            right_distance: distances(&[16.0]),
            ..ReplayScript::default()
        });

        machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        assert_eq!(log.borrow().drive_commands()[0], expected);
    }

    #[test]
    fn start_circle_with_candle_lit_turns_back() {
        let (mut machine, log) = machine(ReplayScript {
            right_distance: distances(&[16.0]),
            line: vec![40, 40],
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        assert_eq!(next, RobotState::FollowRightWall);
        assert!(ctx.flame_still_lit);
        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(9, 9), (9, 9), (-5, 5), (9, 9)]);
        assert_eq!(log.sleeps(), vec![10, 10, 500, 1350, 2000]);
    }

    #[test]
    fn start_circle_after_extinguishing_ends_the_run() {
        let (mut machine, log) = machine(ReplayScript {
            line: vec![40, 40],
            ..ReplayScript::default()
        });
        let ctx = NavigationContext {
            flame_still_lit: false,
            ..NavigationContext::new_run()
        };

        let (next, _) = machine.tick(RobotState::FollowRightWall, ctx);

        assert_eq!(next, RobotState::Idle);
        assert_eq!(log.borrow().display_line(0), Some("WAIT"));
    }

    #[test]
    fn doorway_with_flame_arms_the_scanner() {
        let (mut machine, log) = machine(ReplayScript {
            line: vec![50, 900],
            presence: vec![250],
            flame: vec![3],
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        assert_eq!(next, RobotState::Center);
        assert_eq!(ctx.current_room, 1);
        assert!(ctx.flame_detected_in_room);
        let log = log.borrow();
        assert!(log.led_lit);
        assert!(log.sleeps().contains(&1000));
    }

    #[test]
    fn flame_outside_a_room_is_ignored() {
        let (mut machine, log) = machine(ReplayScript {
            flame: vec![3],
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(RobotState::FollowRightWall, NavigationContext::new_run());

        assert_eq!(next, RobotState::FollowRightWall);
        assert!(!log.borrow().led_lit);
    }

    #[test]
    fn dark_second_room_is_left_with_a_bias() {
        let (mut machine, log) = machine(ReplayScript {
            line: vec![50, 900],
            presence: vec![0],
            ..ReplayScript::default()
        });
        let ctx = NavigationContext {
            current_room: 1,
            ..NavigationContext::new_run()
        };

        let (next, ctx) = machine.tick(RobotState::FollowRightWall, ctx);

        assert_eq!(next, RobotState::FollowRightWall);
        assert_eq!(ctx.current_room, 2);
        assert!(!ctx.flame_detected_in_room);
        assert_eq!(log.borrow().last_drive_command(), Some((12, 6)));
    }

    #[test]
    fn room_counter_saturates() {
        let (mut machine, _log) = machine(ReplayScript {
            line: vec![50, 900],
            presence: vec![0],
            ..ReplayScript::default()
        });
        let ctx = NavigationContext {
            current_room: 3,
            ..NavigationContext::new_run()
        };

        let (_, ctx) = machine.tick(RobotState::FollowRightWall, ctx);

        assert_eq!(ctx.current_room, 3);
    }

    #[rstest]
    #[case(1, (-3, 3))]
    #[case(2, (-3, 3))]
    #[case(4, (3, -3))]
    #[case(5, (3, -3))]
    fn off_center_flame_rotates_in_place(#[case] bearing: i32, #[case] turn: (i32, i32)) {
        let (mut machine, log) = machine(ReplayScript {
            flame: vec![bearing],
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(RobotState::Center, NavigationContext::new_run());

        assert_eq!(next, RobotState::Center);
        assert_eq!(log.borrow().drive_commands(), vec![turn]);
    }

    #[rstest]
    #[case(40.0, RobotState::Center)]
    #[case(15.0, RobotState::Center)]
    #[case(14.9, RobotState::Extinguish)]
    fn centered_flame_is_approached(#[case] front: f32, #[case] expected: RobotState) {
        let (mut machine, log) = machine(ReplayScript {
            flame: vec![3],
            flame_intensity: vec![870],
            front_distance: distances(&[front]),
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(RobotState::Center, NavigationContext::new_run());

        assert_eq!(next, expected);
        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(8, 8)]);
        assert_eq!(log.display_line(1), Some("V:870(300) D:3"));
    }

    #[test]
    fn abort_button_wins_over_the_approach() {
        let (mut machine, log) = machine(ReplayScript {
            flame: vec![3],
            front_distance: distances(&[40.0]),
            stop_button: vec![true],
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(RobotState::Center, NavigationContext::new_run());

        assert_eq!(next, RobotState::Idle);
        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(8, 8)]);
        assert_eq!(log.events.last(), Some(&ReplayEvent::Stop(MotorId::Right)));
    }

    #[test]
    fn extinguish_runs_the_fan_then_heads_home() {
        let (mut machine, log) = machine(ReplayScript {
            front_distance: distances(&[10.0]),
            ..ReplayScript::default()
        });
        let ctx = NavigationContext {
            current_room: 2,
            flame_detected_in_room: true,
            ..NavigationContext::new_run()
        };

        let (next, ctx) = machine.tick(RobotState::Extinguish, ctx);

        assert_eq!(next, RobotState::Return);
        assert!(!ctx.flame_still_lit);
        let log = log.borrow();
        assert_eq!(log.fan_powers(), vec![16, 0]);
        assert!(!log.led_lit);
        assert_eq!(log.sleeps(), vec![2000, 675, 10]);
        assert_eq!(log.drive_commands(), vec![(5, -5), (9, 9)]);
    }

    #[test]
    fn interrupted_delays_do_not_stop_the_fan_sequence() {
        let (mut machine, log) = machine(ReplayScript {
            front_distance: distances(&[10.0]),
            failing_delays: true,
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::Extinguish, NavigationContext::new_run());

        assert_eq!(next, RobotState::Return);
        assert!(!ctx.flame_still_lit);
        assert_eq!(log.borrow().fan_powers(), vec![16, 0]);
    }

    #[test]
    fn left_wall_return_counts_lines() {
        let (mut machine, log) = machine(ReplayScript {
            left_distance: distances(&[10.0]),
            line: vec![50, 900],
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::FollowLeftWall, NavigationContext::default());

        assert_eq!(next, RobotState::FollowLeftWall);
        assert_eq!(ctx.lines_crossed, 1);
        let log = log.borrow();
        assert_eq!(log.drive_commands()[0], (14, 4));
        assert_eq!(log.display_line(1), Some("L: 1"));
    }

    #[test]
    fn back_wall_line_is_crossed_with_a_left_turn() {
        let (mut machine, log) = machine(ReplayScript {
            right_distance: distances(&[16.0]),
            line: vec![50, 900],
            ..ReplayScript::default()
        });

        let (next, ctx) = machine.tick(RobotState::FollowBackWall, NavigationContext::default());

        assert_eq!(next, RobotState::FollowBackWall);
        assert_eq!(ctx.lines_crossed, 1);
        let log = log.borrow();
        assert_eq!(
            log.drive_commands(),
            vec![(9, 9), (9, 9), (9, 9), (-5, 5), (9, 9)]
        );
        assert_eq!(log.sleeps(), vec![10, 10, 500, 500, 675, 5500]);
    }

    #[rstest]
    #[case(RobotState::ReturnRoom3)]
    #[case(RobotState::ReturnRoom4)]
    #[case(RobotState::FollowLeftWall)]
    fn return_paths_stop_at_the_circle(#[case] state: RobotState) {
        let (mut machine, _log) = machine(ReplayScript {
            line: vec![40, 40],
            ..ReplayScript::default()
        });

        let (next, _) = machine.tick(state, NavigationContext::default());

        assert_eq!(next, RobotState::Idle);
    }

    #[test]
    fn gave_up_heading_correction_brakes() {
        let (robot, log) = ReplayScript {
            start_button: vec![true],
            left_distance: distances(&[10.0]),
            right_distance: distances(&[60.0]),
            ..ReplayScript::default()
        }
        .build();
        let mut config = FirebotConfig::default();
        config.polling.max_iterations = Some(3);
        let mut machine = BehaviorMachine::new(robot, config);

        let (next, _) = machine.tick(RobotState::Idle, NavigationContext::default());

        assert_eq!(next, RobotState::Idle);
        let log = log.borrow();
        assert_eq!(log.drive_commands(), vec![(-5, 5); 3]);
        assert!(log.events.contains(&ReplayEvent::Brake(MotorId::Right)));
    }
}
