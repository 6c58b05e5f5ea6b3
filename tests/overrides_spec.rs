use noteboard::capability::Capability;
use noteboard::models::*;
use noteboard::overrides::*;
use speculate2::speculate;
use tempfile::TempDir;

fn sample_feed() -> FeedSnapshot {
    let mut first = Note::new("1");
    first.position = Position::new(10.0, 20.0, 5.0);
    let mut second = Note::new("2");
    second.position = Position::new(70.0, 30.0, -4.0);
    FeedSnapshot::new("Week 3", vec![first, second])
}

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("overrides.json");
        let admin = OverrideStore::open(&path, Capability::Privileged);
        let viewer = OverrideStore::open(&path, Capability::ReadOnly);
    }

    describe "load" {
        it "is empty when the store file is missing" {
            assert!(admin.load().is_empty());
        }

        it "is empty when the store is corrupt and leaves it untouched" {
            std::fs::write(&path, "{not json").unwrap();
            assert!(admin.load().is_empty());
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
        }

        it "is empty when the entry shape is wrong" {
            std::fs::write(&path, r#"{"weekly_fridge_admin_overrides_v2": [1, 2, 3]}"#).unwrap();
            assert!(admin.load().is_empty());
        }

        it "skips unreadable entries and keeps the rest" {
            std::fs::write(
                &path,
                r#"{"weekly_fridge_admin_overrides_v2": {
                    "1": {"position": {"x": 10, "y": 20, "rotation": 0}},
                    "2": "oops",
                    "4": {"pos": {"x": "bad", "y": 40}}
                }}"#,
            )
            .unwrap();

            let overrides = admin.load();
            let ids: Vec<&str> = overrides.keys().map(String::as_str).collect();
            assert_eq!(ids, ["1", "4"]);
            assert_eq!(overrides["4"].position.x, None);
            assert_eq!(overrides["4"].position.y, Some(40.0));
        }

        it "reads the legacy entry shape" {
            std::fs::write(
                &path,
                r#"{"weekly_fridge_admin_overrides_v2": {"1": {"pos": {"x": 1, "y": 2, "rot": 3}}}}"#,
            )
            .unwrap();
            let overrides = admin.load();
            assert_eq!(overrides["1"].position, PartialPosition::from(Position::new(1.0, 2.0, 3.0)));
        }

        it "is always empty for read-only sessions" {
            admin.save("1", Position::new(1.0, 2.0, 3.0)).unwrap();
            assert_eq!(admin.load().len(), 1);
            assert!(viewer.load().is_empty());
        }
    }

    describe "save" {
        it "upserts one entry and keeps the others" {
            admin.save("1", Position::new(1.0, 2.0, 3.0)).unwrap();
            admin.save("2", Position::new(4.0, 5.0, 6.0)).unwrap();
            admin.save("1", Position::new(7.0, 8.0, 9.0)).unwrap();

            let overrides = admin.load();
            assert_eq!(overrides.len(), 2);
            assert_eq!(overrides["1"].position, PartialPosition::from(Position::new(7.0, 8.0, 9.0)));
            assert_eq!(overrides["2"].position, PartialPosition::from(Position::new(4.0, 5.0, 6.0)));
        }

        it "leaves entries it cannot read in place" {
            std::fs::write(
                &path,
                r#"{"weekly_fridge_admin_overrides_v2": {
                    "1": {"position": {"x": 10, "y": 20, "rotation": 0}},
                    "2": "oops"
                }}"#,
            )
            .unwrap();
            admin.save("3", Position::new(30.0, 30.0, 0.0)).unwrap();

            let overrides = admin.load();
            assert_eq!(overrides["1"].position, PartialPosition::from(Position::new(10.0, 20.0, 0.0)));
            assert_eq!(overrides["3"].position, PartialPosition::from(Position::new(30.0, 30.0, 0.0)));

            let document: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(document[DEFAULT_STORAGE_KEY]["2"], "oops");
        }

        it "does nothing for read-only sessions" {
            viewer.save("1", Position::new(1.0, 2.0, 3.0)).unwrap();
            assert!(!path.exists());
        }

        it "keeps unrelated keys in the store file" {
            std::fs::write(&path, r#"{"other_app": {"theme": "dark"}}"#).unwrap();
            admin.save("1", Position::default()).unwrap();

            let document: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(document["other_app"]["theme"], "dark");
            assert_eq!(document[DEFAULT_STORAGE_KEY]["1"]["position"]["x"], 50.0);
        }

        it "creates missing parent directories" {
            let nested = OverrideStore::open(dir.path().join("a/b/overrides.json"), Capability::Privileged);
            nested.save("1", Position::default()).unwrap();
            assert_eq!(nested.load().len(), 1);
        }

        it "namespaces by storage key" {
            let other = OverrideStore::with_key(&path, "another_board", Capability::Privileged);
            admin.save("1", Position::default()).unwrap();
            assert!(other.load().is_empty());
        }
    }

    describe "merge" {
        it "overlays saved positions onto the feed" {
            admin.save("2", Position::new(55.0, 66.0, 0.0)).unwrap();
            let merged = admin.merge(&sample_feed());

            assert_eq!(merged.items[0], sample_feed().items[0]);
            assert_eq!(merged.items[1].position, Position::new(55.0, 66.0, 0.0));
            assert_eq!(merged.label, "Week 3");
        }

        it "does not touch the original snapshot" {
            admin.save("1", Position::new(99.0, 99.0, 0.0)).unwrap();
            let original = sample_feed();
            let _ = admin.merge(&original);
            assert_eq!(original, sample_feed());
        }

        it "is idempotent" {
            admin.save("1", Position::new(5.0, 5.0, 5.0)).unwrap();
            let once = admin.merge(&sample_feed());
            assert_eq!(admin.merge(&once), once);
        }

        it "is a no-op when the store is empty" {
            assert_eq!(admin.merge(&sample_feed()), sample_feed());
        }

        it "is the identity for read-only sessions" {
            admin.save("1", Position::new(5.0, 5.0, 5.0)).unwrap();
            assert_eq!(viewer.merge(&sample_feed()), sample_feed());
        }

        it "ignores overrides for unknown ids" {
            admin.save("ghost", Position::new(5.0, 5.0, 5.0)).unwrap();
            assert_eq!(admin.merge(&sample_feed()), sample_feed());
        }
    }

    describe "clear" {
        it "removes every override" {
            admin.save("1", Position::default()).unwrap();
            admin.clear().unwrap();
            assert!(admin.load().is_empty());
        }

        it "is refused silently for read-only sessions" {
            admin.save("1", Position::default()).unwrap();
            viewer.clear().unwrap();
            assert_eq!(admin.load().len(), 1);
        }
    }
}
