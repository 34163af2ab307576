use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Datelike, NaiveDate, Timelike};

use super::*;
use crate::osu::beatmaps::{self, Beatmap, BeatmapOption};
use crate::osu::matches::MatchResponse;
use crate::osu::replay::{self, Keys, Replay, ReplayOption};
use crate::osu::scores::{self, Score, ScoresOption};
use crate::osu::user::{self, User, UserOption};
use crate::osu::user_best::{self, UserBestOption};
use crate::osu::user_recent::{self, RecentScore, UserRecentOption};
use crate::osu::{
    decode_replay, ApprovalStatus, Client, Genre, Language, Mode, Mods, OsuApiError, ReplayError,
    ReplayEvent, UsernameType,
};

fn compress(text: &str) -> Vec<u8> {
    let mut compressed = Vec::new();
    lzma_rs::lzma_compress(&mut text.as_bytes(), &mut compressed).unwrap();
    compressed
}

fn encode(text: &str) -> String {
    STANDARD.encode(compress(text))
}

fn event(millis: u64, x: f64, y: f64, keys: u32) -> ReplayEvent {
    ReplayEvent {
        time_delta: Duration::from_millis(millis),
        x,
        y,
        keys,
    }
}

#[test]
fn load_settings() {
    let settings = settings::Settings::from_profile("debug");
    assert!(settings.is_ok());
    assert_eq!(settings.unwrap().timeout_secs, 10);
}

#[test]
fn missing_profile() {
    let settings = settings::Settings::from_profile("does_not_exist");
    assert!(matches!(settings, Err(settings::SettingsError::Io(_))));
}

#[test]
fn profile_key_wins() {
    let settings = settings::Settings {
        api_key: Some("abc".to_string()),
        ..Default::default()
    };
    assert_eq!(settings.api_key().unwrap(), "abc");
    assert!(Client::from_settings(&settings).is_ok());
}

// replay decoding

#[test]
fn decode_example_replay() {
    let payload = encode("0|100.0|200.0|0,50|150.5|210.2|1,-5|0|0|0");
    let events = decode_replay(payload.as_bytes()).unwrap();

    assert_eq!(
        events,
        vec![event(0, 100.0, 200.0, 0), event(50, 150.5, 210.2, 1)]
    );
}

#[test]
fn decode_strips_json_escaping() {
    let payload = encode("16|256|192|5,17|257.25|191.5|5");
    let escaped = format!("\"{}\"", payload.replace('/', "\\/"));
    let events = decode_replay(escaped.as_bytes()).unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[1], event(17, 257.25, 191.5, 5));
}

#[test]
fn malformed_frames_are_skipped() {
    let payload = encode("10|1.0|2.0|0,10|1.0");
    let events = decode_replay(payload.as_bytes()).unwrap();
    assert_eq!(events, vec![event(10, 1.0, 2.0, 0)]);

    let payload = encode("a|b|c|d,5|1|2|3,1|2|3|4|5,");
    let events = decode_replay(payload.as_bytes()).unwrap();
    assert_eq!(events, vec![event(0, 0.0, 0.0, 0), event(5, 1.0, 2.0, 3)]);
}

#[test]
fn unparseable_fields_default_to_zero() {
    let payload = encode("10|1|1|0,5|abc|0|0,20|2|2|0");
    let events = decode_replay(payload.as_bytes()).unwrap();

    assert_eq!(events.len(), 3);
    assert_eq!(events[1], event(5, 0.0, 0.0, 0));
    assert_eq!(
        events.iter().map(|e| e.time_delta).sum::<Duration>(),
        Duration::from_millis(35)
    );

    let events = decode_replay(encode("x|1|1|0,-3|1|1|0").as_bytes()).unwrap();
    assert_eq!(events, vec![event(0, 1.0, 1.0, 0)]);
}

#[test]
fn sentinel_frames_are_dropped() {
    let payload = encode("-1|256|-500|0,0|256|-500|0,-12345|0|0|7433");
    let events = decode_replay(payload.as_bytes()).unwrap();
    assert_eq!(events, vec![event(0, 256.0, -500.0, 0)]);
}

#[test]
fn frame_count_matches_valid_segments() {
    let text = "0|0|0|0,1|1|1|1,-1|2|2|2,3|3|3,4|4|4|4|4,5|5|5|5,,6|6|6|6";
    let expected = text
        .split(',')
        .filter(|frame| frame.matches('|').count() == 3)
        .filter(|frame| !frame.starts_with('-'))
        .count();

    let events = decode_replay(encode(text).as_bytes()).unwrap();
    assert_eq!(events.len(), expected);
    assert_eq!(events.len(), 4);
}

#[test]
fn order_is_preserved_and_decoding_is_repeatable() {
    let text = "30|3|3|0,10|1|1|0,20|2|2|0,10|1|1|0";
    let payload = encode(text);

    let first = decode_replay(payload.as_bytes()).unwrap();
    let second = decode_replay(payload.as_bytes()).unwrap();
    assert_eq!(first, second);

    let deltas: Vec<u128> = first.iter().map(|e| e.time_delta.as_millis()).collect();
    assert_eq!(deltas, vec![30, 10, 20, 10]);
}

#[test]
fn empty_replay_decodes_to_nothing() {
    let events = decode_replay(encode("").as_bytes()).unwrap();
    assert!(events.is_empty());
}

#[test]
fn invalid_base64_fails() {
    let result = decode_replay(b"this is not base64!!");
    assert!(matches!(result, Err(ReplayError::Decode(_))));
}

#[test]
fn invalid_lzma_fails() {
    let garbage = STANDARD.encode([0xffu8; 32]);
    let result = decode_replay(garbage.as_bytes());
    assert!(matches!(result, Err(ReplayError::Decompress(_))));

    let short = STANDARD.encode(b"not lzma");
    let result = decode_replay(short.as_bytes());
    assert!(matches!(result, Err(ReplayError::Decompress(_))));
}

#[test]
fn truncated_lzma_fails() {
    let frames: Vec<String> = (0..500)
        .map(|i| format!("{}|{}.5|{}.25|{}", i % 17, i, i * 3, i % 4))
        .collect();
    let compressed = compress(&frames.join(","));
    let truncated = STANDARD.encode(&compressed[..compressed.len() / 2]);

    let result = decode_replay(truncated.as_bytes());
    assert!(matches!(result, Err(ReplayError::Decompress(_))));
}

#[test]
fn key_state_is_not_validated() {
    let events = decode_replay(encode("1|0|0|5,1|0|0|262144").as_bytes()).unwrap();
    assert_eq!(events[0].pressed(), Keys::M1 | Keys::K1);
    assert_eq!(events[1].keys, 262144);
}

#[test]
fn replay_response() {
    let body = format!(
        r#"{{"content":"{}","encoding":"base64"}}"#,
        encode("0|10|10|0,-1|0|0|0,100|20|20|1,250|30|30|0")
    );
    let replay: Replay = osu::parse_body(&body).unwrap();

    assert_eq!(replay.content.len(), 3);
    assert_eq!(replay.encoding.as_deref(), Some("base64"));
    assert_eq!(replay.duration(), Duration::from_millis(350));
}

#[test]
fn wrapped_base64_decodes() {
    let payload = encode("0|10|10|0,100|20|20|1,250|30|30|0");
    let wrapped = payload
        .as_bytes()
        .chunks(20)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect::<Vec<_>>()
        .join("\r\n");
    let events = decode_replay(wrapped.as_bytes()).unwrap();
    assert_eq!(events.len(), 3);

    let body = format!(
        r#"{{"content":"{}","encoding":"base64"}}"#,
        payload
            .as_bytes()
            .chunks(20)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\\n")
    );
    let replay: Replay = osu::parse_body(&body).unwrap();
    assert_eq!(replay.content, events);
}

#[test]
fn replay_survives_json_round_trip() {
    let body = format!(
        r#"{{"content":"{}","encoding":"base64"}}"#,
        encode("0|10|10|0,-1|0|0|0,16|256.5|191.25|5,250|30|30|0")
    );
    let replay: Replay = osu::parse_body(&body).unwrap();

    let json = serde_json::to_string(&replay).unwrap();
    let reparsed: Replay = serde_json::from_str(&json).unwrap();

    assert_eq!(reparsed.content, replay.content);
    assert_eq!(reparsed.encoding.as_deref(), Some("base64"));
    assert_eq!(reparsed.duration(), Duration::from_millis(266));
}

#[test]
fn replay_response_with_bad_content() {
    let result = osu::parse_body::<Replay>(r#"{"content":"@@@","encoding":"base64"}"#);
    assert!(matches!(result, Err(OsuApiError::Parse(_))));
}

// query building

#[test]
fn beatmaps_url() {
    let client = Client::new("secret");
    let url = beatmaps::url(
        &client,
        &[
            BeatmapOption::Limit(1000),
            BeatmapOption::Mode(Mode::Taiko),
            BeatmapOption::IncludeConverted,
            BeatmapOption::Since(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()),
            BeatmapOption::Creator("peppy two".to_string(), UsernameType::Name),
        ],
    )
    .unwrap();

    assert_eq!(
        url.as_str(),
        "https://osu.ppy.sh/api/get_beatmaps?k=secret&limit=500&m=1&a=1&since=2020-01-02&u=peppy+two&type=string"
    );
}

#[test]
fn limits_are_clamped() {
    let client = Client::new("k");

    let url = beatmaps::url(&client, &[BeatmapOption::Limit(0)]).unwrap();
    assert_eq!(url.query(), Some("k=k&limit=1"));

    let url = user::url(&client, "2", UsernameType::Id, &[UserOption::EventDays(90)]).unwrap();
    assert_eq!(url.query(), Some("k=k&u=2&type=id&event_days=31"));

    let url = scores::url(&client, 1, &[ScoresOption::Limit(101)]).unwrap();
    assert_eq!(url.query(), Some("k=k&b=1&limit=100"));

    let url = user_best::url(&client, "a", UsernameType::Name, &[UserBestOption::Limit(500)])
        .unwrap();
    assert_eq!(url.query(), Some("k=k&u=a&type=string&limit=100"));

    let url = user_recent::url(&client, "a", UsernameType::Name, &[UserRecentOption::Limit(51)])
        .unwrap();
    assert_eq!(url.query(), Some("k=k&u=a&type=string&limit=50"));
}

#[test]
fn scores_url() {
    let client = Client::new("k");
    let url = scores::url(
        &client,
        252002,
        &[
            ScoresOption::User("1".to_string(), UsernameType::Id),
            ScoresOption::Mods(Mods::HIDDEN | Mods::HARD_ROCK),
            ScoresOption::Mode(Mode::Osu),
        ],
    )
    .unwrap();

    assert_eq!(
        format!("{}?{}", url.path(), url.query().unwrap()),
        "/api/get_scores?k=k&b=252002&u=1&type=id&mods=24&m=0"
    );
}

#[test]
fn replay_url() {
    let client = Client::new("k");
    let url = replay::url(
        &client,
        252002,
        "some user",
        UsernameType::Name,
        &[
            ReplayOption::Mode(Mode::Mania),
            ReplayOption::ScoreId(2177560145),
        ],
    )
    .unwrap();

    assert_eq!(
        url.query(),
        Some("k=k&b=252002&u=some+user&type=string&m=3&s=2177560145")
    );
}

#[test]
fn custom_base_url() {
    let client = Client::with_base_url("k", "http://localhost:8080/api").unwrap();
    let url = user::url(&client, "1", UsernameType::Id, &[]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/api/get_user?k=k&u=1&type=id");

    assert!(matches!(
        Client::with_base_url("k", "not a url"),
        Err(OsuApiError::Url(_))
    ));
}

// response handling

#[test]
fn error_bodies_are_surfaced() {
    let result = osu::parse_body::<Vec<Beatmap>>(r#"{"error":"Please provide a valid API key."}"#);
    match result {
        Err(OsuApiError::Api(message)) => assert_eq!(message, "Please provide a valid API key."),
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(osu::api_error(r#"[{"title":"error"}]"#), None);
    assert_eq!(osu::api_error(r#"["error"]"#), None);
}

#[test]
fn error_key_anywhere_in_object() {
    let result = osu::parse_body::<MatchResponse>(r#"{"games":[],"error":"Say \"hi\""}"#);
    match result {
        Err(OsuApiError::Api(message)) => assert_eq!(message, r#"Say "hi""#),
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
}

#[test]
fn dates_are_patched() {
    let body = r#"{"date":"2013-07-02 01:01:12","last_update" : "2014-01-01 00:00:00","start_time":"2016-03-03 09:33:35","title":"2013-07-02 01:01:12","end_time":null}"#;
    assert_eq!(
        osu::patch_dates(body),
        r#"{"date": "2013-07-02T01:01:12+00:00","last_update": "2014-01-01T00:00:00+00:00","start_time": "2016-03-03T09:33:35+00:00","title":"2013-07-02 01:01:12","end_time":null}"#
    );
}

#[test]
fn parse_beatmaps() {
    let body = r#"[{"approved":"1","submit_date":"2013-05-15 11:32:26","approved_date":"2013-07-06 08:54:46","last_update":"2013-07-06 08:51:22","artist":"Luxion","beatmap_id":"252002","beatmapset_id":"93398","bpm":"196","creator":"RikiH_","creator_id":"686209","difficultyrating":"5.744717597961426","diff_aim":"2.7706098556518555","diff_speed":"2.9062750339508057","diff_size":"4","diff_overall":"8","diff_approach":"9","diff_drain":"7","hit_length":"114","source":"BMS","genre_id":"2","language_id":"5","title":"High-Priestess","total_length":"146","version":"Overkill","file_md5":"c8f08438204abfcdd1a748ebfae67421","mode":"0","tags":"kloyd flower roxas","favourite_count":"140","rating":"9.44779","playcount":"94637","passcount":"10599","count_normal":"388","count_slider":"222","count_spinner":"3","max_combo":"899","storyboard":"0","video":"0","download_unavailable":"0","audio_unavailable":"0"},
        {"approved":"-2","submit_date":"2020-01-01 00:00:00","approved_date":null,"last_update":"2020-01-02 00:00:00","artist":"a","beatmap_id":"1","beatmapset_id":"2","bpm":"120.5","creator":"c","creator_id":"3","difficultyrating":"1.5","diff_size":"4","diff_overall":"5","diff_approach":"5","diff_drain":"5","hit_length":"60","source":"","genre_id":"14","language_id":"14","title":"t","total_length":"61","version":"Normal","file_md5":"x","mode":"1","tags":"","favourite_count":"0","rating":"0","playcount":"0","passcount":"0","max_combo":null}]"#;
    let beatmaps: Vec<Beatmap> = osu::parse_body(body).unwrap();

    let luxion = &beatmaps[0];
    assert_eq!(luxion.approved, ApprovalStatus::Ranked);
    assert_eq!(luxion.beatmap_id, 252002);
    assert_eq!(luxion.bpm, 196.0);
    assert_eq!(luxion.genre_id, Genre::VideoGame);
    assert_eq!(luxion.language_id, Language::Instrumental);
    assert_eq!(luxion.mode, Mode::Osu);
    assert_eq!(luxion.max_combo, Some(899));
    let approved = luxion.approved_date.unwrap();
    assert_eq!((approved.year(), approved.month(), approved.day()), (2013, 7, 6));
    assert_eq!((approved.hour(), approved.minute()), (8, 54));

    let graveyard = &beatmaps[1];
    assert_eq!(graveyard.approved, ApprovalStatus::Graveyard);
    assert!(graveyard.approved_date.is_none());
    assert_eq!(graveyard.max_combo, None);
    assert_eq!(graveyard.count_normal, None);
    assert_eq!(graveyard.genre_id, Genre::Jazz);
    assert_eq!(graveyard.language_id, Language::Other);
}

#[test]
fn parse_user() {
    let body = r#"[{"user_id":"1","username":"User name","join_date":"2008-02-18 20:30:00","count300":"1337","count100":"123","count50":"69","playcount":"42","ranked_score":"666666","total_score":"999999998","pp_rank":"2442","level":"50.5050","pp_raw":"3113","accuracy":"98.1234","count_rank_ss":"54","count_rank_ssh":"54","count_rank_s":"81","count_rank_sh":"81","count_rank_a":"862","country":"DE","total_seconds_played":"12345","pp_country_rank":"1337","events":[{"display_html":"<img src='\/images\/A_small.png'\/>","beatmap_id":"222342","beatmapset_id":"54851","date":"2013-07-07 22:34:04","epicfactor":"1"}]},
        {"user_id":"2","username":"Lurker","join_date":"2010-01-01 00:00:00","count300":null,"count100":null,"count50":null,"playcount":null,"ranked_score":null,"total_score":null,"pp_rank":null,"level":null,"pp_raw":null,"accuracy":null,"count_rank_ss":null,"count_rank_ssh":null,"count_rank_s":null,"count_rank_sh":null,"count_rank_a":null,"country":"JP","total_seconds_played":null,"pp_country_rank":null,"events":[]}]"#;
    let users: Vec<User> = osu::parse_body(body).unwrap();

    assert_eq!(users[0].user_id, 1);
    assert_eq!(users[0].pp_raw, Some(3113.0));
    assert_eq!(users[0].events.len(), 1);
    assert_eq!(users[0].events[0].beatmap_id, Some(222342));
    assert_eq!(users[0].events[0].display_html, "<img src='/images/A_small.png'/>");
    assert_eq!(users[0].join_date.year(), 2008);

    assert_eq!(users[1].playcount, None);
    assert_eq!(users[1].accuracy, None);
    assert!(users[1].events.is_empty());
}

#[test]
fn parse_scores() {
    let body = r#"[{"score_id":"7654321","score":"1234567","username":"User name","count300":"300","count100":"50","count50":"10","countmiss":"1","maxcombo":"321","countkatu":"10","countgeki":"50","perfect":"0","enabled_mods":"584","user_id":"1","date":"2013-06-22 09:11:16","rank":"SH","pp":null,"replay_available":"1"}]"#;
    let scores: Vec<Score> = osu::parse_body(body).unwrap();

    let score = &scores[0];
    assert_eq!(score.score_id, 7654321);
    assert!(!score.perfect);
    assert!(score.replay_available);
    assert_eq!(score.pp, None);
    assert_eq!(
        score.enabled_mods,
        Mods::HIDDEN | Mods::DOUBLE_TIME | Mods::NIGHTCORE
    );
}

#[test]
fn parse_recent_scores() {
    let body = r#"[{"beatmap_id":"1","score":"0","maxcombo":"3","count50":"0","count100":"0","count300":"3","countmiss":"1","countkatu":"0","countgeki":"1","perfect":"0","enabled_mods":"0","user_id":"2","date":"2021-01-01 12:00:00","rank":"F"}]"#;
    let scores: Vec<RecentScore> = osu::parse_body(body).unwrap();

    assert!(!scores[0].passed());
    assert!(scores[0].enabled_mods.is_empty());
}

#[test]
fn parse_match() {
    let body = r#"{"match":{"match_id":"1936471","name":"Ice cream vs Joyful","start_time":"2016-03-03 09:33:35","end_time":null},"games":[{"game_id":"1234","start_time":"2016-03-03 09:35:35","end_time":"2016-03-03 09:38:35","beatmap_id":"795432","play_mode":"0","match_type":"0","scoring_type":"3","team_type":"2","mods":"1","scores":[{"slot":"0","team":"1","user_id":"1","score":"1234","maxcombo":"100","rank":"0","count50":"0","count100":"1","count300":"99","countmiss":"0","countgeki":"10","countkatu":"1","perfect":"0","pass":"1","enabled_mods":null}]}]}"#;
    let response: MatchResponse = osu::parse_body(body).unwrap();
    let lobby = response.into_match().unwrap();

    assert_eq!(lobby.info.match_id, 1936471);
    assert!(lobby.info.end_time.is_none());
    assert_eq!(lobby.games.len(), 1);

    let game = &lobby.games[0];
    assert_eq!(game.scoring_type, osu::ScoringType::ScoreV2);
    assert_eq!(game.team_type, osu::TeamType::TeamVs);
    assert_eq!(game.mods, Mods::NO_FAIL);
    assert!(game.scores[0].pass);
    assert!(game.scores[0].enabled_mods.is_none());
}

#[test]
fn parse_unknown_match() {
    let response: MatchResponse = osu::parse_body(r#"{"match":0,"games":[]}"#).unwrap();
    assert!(response.into_match().is_none());
}

#[test]
fn broken_match_is_a_parse_error() {
    let body = r#"{"match":{"match_id":"1936471","name":"Ice cream vs Joyful","start_time":"2016-03-03 09:33:35","end_time":"not a date"},"games":[]}"#;
    let result = osu::parse_body::<MatchResponse>(body);
    assert!(matches!(result, Err(OsuApiError::Parse(_))));
}

// enums

#[test]
fn mods_display() {
    assert_eq!((Mods::HIDDEN | Mods::HARD_ROCK).to_string(), "[Hidden, HardRock]");
    assert_eq!(Mods::empty().to_string(), "[]");
    assert_eq!(
        Mods::from_bits_retain(72).list(),
        vec![Mods::HIDDEN, Mods::DOUBLE_TIME]
    );
    assert!(Mods::KEY_MOD.contains(Mods::KEY4 | Mods::KEY_COOP));
    assert_eq!(Mods::KEY_MOD.name(), None);
}

#[test]
fn numeric_enums() {
    assert_eq!("3".parse::<Mode>(), Ok(Mode::Mania));
    assert_eq!(" -1 ".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Wip));
    assert!("8".parse::<Genre>().is_err());
    assert!("osu".parse::<Mode>().is_err());
    assert_eq!(ApprovalStatus::Loved.code(), 4);
    assert_eq!(Mode::Ctb.to_string(), "Ctb");
    assert_eq!(serde_json::to_string(&Mode::Taiko).unwrap(), "1");
    assert_eq!(serde_json::from_str::<Mode>("2").unwrap(), Mode::Ctb);
}
