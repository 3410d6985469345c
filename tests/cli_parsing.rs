use clap::Parser;
use uuid::Uuid;

use tallyboard::cli::commands::goal::GoalCommands;
use tallyboard::cli::commands::progress::ProgressCommands;
use tallyboard::cli::{Cli, Commands};

const TEAM: &str = "11111111-1111-1111-1111-111111111111";
const PLAYER: &str = "22222222-2222-2222-2222-222222222222";
const GOAL: &str = "55555555-5555-5555-5555-555555555555";

#[test]
fn test_parse_goal_create_defaults() {
    let cli = Cli::try_parse_from(["tallyboard", "goal", "create", "--team", TEAM, "--title", "Mobility"]).unwrap();

    match cli.command {
        Commands::Goal(args) => match args.command {
            GoalCommands::Create { team, title, goal_type, target, subject, team_goal, description } => {
                assert_eq!(team, Uuid::parse_str(TEAM).unwrap());
                assert_eq!(title, "Mobility");
                assert_eq!(goal_type, "Skill");
                assert_eq!(target, 1);
                assert!(subject.is_none());
                assert!(!team_goal);
                assert!(description.is_none());
            }
            _ => panic!("Wrong goal command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_team_goal_with_unbounded_target() {
    let cli = Cli::try_parse_from([
        "tallyboard", "goal", "create", "--team", TEAM, "--title", "Wall Ball", "--type", "Character",
        "--target", "0", "--team-goal",
    ])
    .unwrap();

    match cli.command {
        Commands::Goal(args) => match args.command {
            GoalCommands::Create { goal_type, target, team_goal, .. } => {
                assert_eq!(goal_type, "Character");
                assert_eq!(target, 0);
                assert!(team_goal);
            }
            _ => panic!("Wrong goal command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_subject_conflicts_with_team_goal() {
    let result = Cli::try_parse_from([
        "tallyboard", "goal", "create", "--team", TEAM, "--title", "x", "--subject", PLAYER, "--team-goal",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_progress_mark_with_global_json() {
    let cli = Cli::try_parse_from(["tallyboard", "progress", "mark", GOAL, "--subject", PLAYER, "--json"]).unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Progress(args) => match args.command {
            ProgressCommands::Mark { goal_id, subject } => {
                assert_eq!(goal_id, Uuid::parse_str(GOAL).unwrap());
                assert_eq!(subject, Some(Uuid::parse_str(PLAYER).unwrap()));
            }
            _ => panic!("Wrong progress command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_progress_show_week() {
    let cli = Cli::try_parse_from(["tallyboard", "progress", "show", GOAL, "--week", "2024-09-18"]).unwrap();

    match cli.command {
        Commands::Progress(args) => match args.command {
            ProgressCommands::Show { week, subject, .. } => {
                assert_eq!(week.as_deref(), Some("2024-09-18"));
                assert!(subject.is_none());
            }
            _ => panic!("Wrong progress command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_invalid_goal_id_rejected() {
    assert!(Cli::try_parse_from(["tallyboard", "progress", "mark", "not-a-uuid"]).is_err());
}

#[test]
fn test_parse_week_and_config_flag() {
    let cli = Cli::try_parse_from(["tallyboard", "--config", "/tmp/tally.yaml", "week", "--date", "2024-12-29"]).unwrap();

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/tally.yaml")));
    match cli.command {
        Commands::Week(args) => assert_eq!(args.date.as_deref(), Some("2024-12-29")),
        _ => panic!("Wrong top-level command"),
    }
}
