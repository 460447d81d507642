//! An in-memory stand-in for the database service, speaking the same paths
//! and payload shapes, with a request log and one-shot fault injection.

use std::{cell::RefCell, collections::HashMap};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ffcs_core::{
    ObjectId,
    model::{
        CampaignScope, Collection, PlateKey,
        fishing::{DEFAULT_XTAL_PREFIX, ShifterReport, next_xtal_number, xtal_name},
        library::Fragment,
        status::Stage,
    },
    timestamp,
};
use itertools::Itertools;
use rstest::fixture;
use serde_json::{Value as Json, json};

use crate::{
    error::{Error, Result},
    transport::{Method, Request, Response, Transport},
};

enum Fault {
    Status(u16),
    Disconnect,
}

struct Armed {
    path: String,
    skip: usize,
    fault: Fault,
}

#[derive(Default)]
pub struct FakeService {
    store: RefCell<Store>,
    requests: RefCell<Vec<Request>>,
    faults: RefCell<Vec<Armed>>,
}

#[fixture]
pub fn service() -> FakeService {
    FakeService::default()
}

impl FakeService {
    /// The next request under `path` is answered with `status`.
    pub fn fail(&self, path: &str, status: u16) {
        self.arm(path, 0, Fault::Status(status));
    }

    /// `skip` requests under `path` go through, the one after fails with 500.
    pub fn fail_after(&self, path: &str, skip: usize) {
        self.arm(path, skip, Fault::Status(500));
    }

    /// The next request under `path` never gets an answer.
    pub fn disconnect(&self, path: &str) {
        self.arm(path, 0, Fault::Disconnect);
    }

    fn arm(&self, path: &str, skip: usize, fault: Fault) {
        self.faults.borrow_mut().push(Armed {
            path: path.to_string(),
            skip,
            fault,
        });
    }

    fn take_fault(&self, path: &str) -> Option<Fault> {
        let mut faults = self.faults.borrow_mut();
        let index = faults.iter().position(|armed| path.starts_with(&armed.path))?;

        if faults[index].skip > 0 {
            faults[index].skip -= 1;
            return None;
        }

        Some(faults.remove(index).fault)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn count_requests(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.path.starts_with(path))
            .count()
    }

    /// Adds the plate if it is missing and one untreated well per label.
    pub fn seed_wells(&self, key: &PlateKey, labels: &[&str]) -> Vec<ObjectId> {
        let mut store = self.store.borrow_mut();

        if !store.docs(Collection::Plates).iter().any(|plate| on_plate(plate, key)) {
            store.insert(
                Collection::Plates,
                json!({
                    "userAccount": key.user_account(),
                    "campaignId": key.campaign_id(),
                    "plateId": key.plate_id,
                    "dropVolume": 0.05,
                }),
            );
        }

        labels
            .iter()
            .map(|label| {
                store.insert(
                    Collection::Wells,
                    json!({
                        "userAccount": key.user_account(),
                        "campaignId": key.campaign_id(),
                        "plateId": key.plate_id,
                        "well": label,
                        "wellEcho": label,
                        "x": 1,
                        "y": 1,
                        "xEcho": 1.0,
                        "yEcho": 1.0,
                    }),
                )
            })
            .collect()
    }

    pub fn seed_library(&self, scope: Option<&CampaignScope>, name: &str, fragments: Vec<Fragment>) -> ObjectId {
        let mut library = json!({
            "libraryName": name,
            "libraryBarcode": "A98765",
            "fragments": fragments,
        });

        let collection = match scope {
            Some(scope) => {
                library["userAccount"] = json!(scope.user_account);
                library["campaignId"] = json!(scope.campaign_id);
                Collection::CampaignLibraries
            }
            None => Collection::Libraries,
        };

        self.store.borrow_mut().insert(collection, library)
    }
}

impl Transport for FakeService {
    fn send(&self, request: &Request) -> Result<Response> {
        self.requests.borrow_mut().push(request.clone());

        match self.take_fault(&request.path) {
            Some(Fault::Disconnect) => {
                return Err(Error::Transport {
                    message: format!("connection reset on {}", request.path),
                });
            }
            Some(Fault::Status(status)) => {
                return Ok(Response::json(status, &json!({"detail": "injected failure"})));
            }
            None => {}
        }

        let (status, body) = self.store.borrow_mut().route(request);

        Ok(Response::json(status, &body))
    }
}

type Reply = (u16, Json);

const CRYO_FIELDS: &[(&str, &str)] = &[
    ("cryoDesiredConcentration", "cryo_desired_concentration"),
    ("cryoTransferVolume", "cryo_transfer_volume"),
    ("cryoSourceWell", "cryo_source_well"),
    ("cryoName", "cryo_name"),
    ("cryoBarcode", "cryo_barcode"),
];

const REDESOLVE_FIELDS: &[(&str, &str)] = &[
    ("redesolveTransferVolume", "redesolve_transfer_volume"),
    ("redesolveSourceWell", "redesolve_source_well"),
    ("redesolveName", "redesolve_name"),
    ("redesolveBarcode", "redesolve_barcode"),
];

const LIBRARY_FIELDS: &[&str] = &[
    "libraryId",
    "libraryName",
    "libraryBarcode",
    "compoundCode",
    "smiles",
    "sourceWell",
    "libraryConcentration",
    "solventTest",
    "solventVolume",
    "ligandTransferVolume",
    "ligandConcentration",
];

fn not_found() -> Reply {
    (404, json!({"detail": "Not Found"}))
}

fn found(doc: Option<&Json>) -> Reply {
    doc.map_or_else(not_found, |doc| (200, doc.clone()))
}

fn counts(n: usize) -> Json {
    json!({
        "matched_count": n,
        "modified_count": n,
        "upserted_id": null,
        "raw_result": {"n": n, "nModified": n, "ok": 1.0, "updatedExisting": n > 0},
    })
}

fn legacy(n: usize) -> Json {
    json!({"nModified": n, "ok": 1.0, "n": n})
}

fn now() -> Json {
    json!(timestamp::format(&timestamp::now()))
}

fn decode(segment: &str) -> String {
    url::form_urlencoded::parse(format!("v={segment}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn text(value: &Json) -> &str {
    value.as_str().unwrap_or_default()
}

fn in_scope(doc: &Json, user: &str, campaign: &str) -> bool {
    doc["userAccount"] == user && doc["campaignId"] == campaign
}

fn on_plate(doc: &Json, key: &PlateKey) -> bool {
    in_scope(doc, key.user_account(), key.campaign_id()) && doc["plateId"] == key.plate_id.as_str()
}

fn takes_part(well: &Json, stage: Stage) -> bool {
    match stage {
        Stage::Soak => true,
        Stage::Cryo => well["cryoProtection"] == true,
        Stage::Redesolve => well["redesolveApplied"] == true,
    }
}

/// Query values compare against the stored value's text.
fn matches_query(stored: &Json, wanted: &str) -> bool {
    match stored {
        Json::String(s) => s == wanted,
        other => other.to_string() == wanted,
    }
}

/// Sets a dot-separated path the way a `$set` does, so `fragments.1.used`
/// touches one array element only.
fn set_path(doc: &mut Json, path: &str, value: Json) {
    let (parent, leaf) = path.rsplit_once('.').unwrap_or(("", path));
    let pointer = parent.split('.').filter(|part| !part.is_empty()).fold(String::new(), |pointer, part| {
        format!("{pointer}/{part}")
    });

    match doc.pointer_mut(&pointer) {
        Some(Json::Array(items)) => {
            if let Some(slot) = leaf.parse::<usize>().ok().and_then(|index| items.get_mut(index)) {
                *slot = value;
            }
        }
        Some(target @ (Json::Object(_) | Json::Null)) => target[leaf] = value,
        _ => {}
    }
}

fn robot_time(raw: &str) -> Json {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map_or(Json::Null, |ts| json!(timestamp::format(&ts)))
}

fn robot_duration(raw: &str) -> Json {
    let day = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default();

    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_or(Json::Null, |time| json!(timestamp::format(&day.and_time(time))))
}

#[derive(Default)]
struct Store {
    collections: HashMap<Collection, Vec<Json>>,
}

impl Store {
    fn docs(&self, collection: Collection) -> &[Json] {
        self.collections.get(&collection).map_or(&[], Vec::as_slice)
    }

    fn docs_mut(&mut self, collection: Collection) -> &mut Vec<Json> {
        self.collections.entry(collection).or_default()
    }

    fn insert(&mut self, collection: Collection, mut doc: Json) -> ObjectId {
        let id = ObjectId::new();
        doc["_id"] = json!(id.to_hex());
        self.docs_mut(collection).push(doc);

        id
    }

    fn add(&mut self, collection: Collection, doc: Json) -> Reply {
        let id = self.insert(collection, doc);

        (200, json!({"acknowledged": true, "inserted_id": id.to_hex()}))
    }

    fn select(&self, collection: Collection, keep: impl Fn(&Json) -> bool) -> Json {
        Json::Array(self.docs(collection).iter().filter(|doc| keep(*doc)).cloned().collect())
    }

    fn by_id(&self, collection: Collection, id: &str) -> Reply {
        found(self.docs(collection).iter().find(|doc| doc["_id"] == id))
    }

    /// Applies `change` to every well `pick` selects and counts them.
    fn each_well(&mut self, pick: impl Fn(&Json) -> bool, mut change: impl FnMut(&mut Json)) -> usize {
        let mut n = 0;
        for well in self.docs_mut(Collection::Wells).iter_mut().filter(|well| pick(&**well)) {
            change(well);
            n += 1;
        }

        n
    }

    fn route(&mut self, request: &Request) -> Reply {
        let segments: Vec<String> = request
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode)
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let body = request.body.clone().unwrap_or_default();
        let param = |key: &str| request.param(key).unwrap_or_default();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["check_if_db_connected"]) => (200, json!({"status": "connected"})),
            (Method::Delete, ["delete_by_id", collection, id]) => self.delete_by_id(collection, id),

            (Method::Post, ["add_plate"]) => self.add(Collection::Plates, body),
            (Method::Get, ["get_plate", user, campaign, plate]) => found(
                self.docs(Collection::Plates)
                    .iter()
                    .find(|doc| in_scope(doc, user, campaign) && doc["plateId"] == *plate),
            ),
            (Method::Get, ["get_plates", user, campaign]) => {
                (200, self.select(Collection::Plates, |doc| in_scope(doc, user, campaign)))
            }
            (Method::Get, ["get_campaigns", user]) => {
                let campaigns: Vec<&str> = self
                    .docs(Collection::Plates)
                    .iter()
                    .filter(|doc| doc["userAccount"] == *user)
                    .map(|doc| text(&doc["campaignId"]))
                    .unique()
                    .collect();

                (200, json!(campaigns))
            }
            (Method::Get, ["is_plate_in_database", plate]) => {
                let exists = self.docs(Collection::Plates).iter().any(|doc| doc["plateId"] == *plate);

                (200, json!({"exists": exists}))
            }

            (Method::Post, ["add_well"]) => self.add(Collection::Wells, body),
            (Method::Post, ["add_wells"]) => {
                for well in body.as_array().cloned().unwrap_or_default() {
                    self.insert(Collection::Wells, well);
                }

                (200, Json::Null)
            }
            (Method::Get, ["get_one_well"]) => self.by_id(Collection::Wells, param("well_id")),
            (Method::Get, ["get_all_wells"]) => (
                200,
                self.select(Collection::Wells, |doc| {
                    in_scope(doc, param("user_account"), param("campaign_id"))
                }),
            ),
            (Method::Get, ["get_wells_from_plate"]) => (200, self.wells_from_plate(request)),
            (Method::Get, ["get_soaked_wells", user, campaign]) => {
                let soaked = self.select(Collection::Wells, |doc| {
                    in_scope(doc, user, campaign) && doc["soakStatus"] == "done"
                });

                (200, json!({"result": soaked}))
            }
            (Method::Get, ["get_number_of_unsoaked_wells", user, campaign]) => {
                let unsoaked = self
                    .docs(Collection::Wells)
                    .iter()
                    .filter(|doc| in_scope(doc, user, campaign) && doc["soakStatus"] != "done")
                    .count();

                (200, json!({"number_of_unsoaked_wells": unsoaked}))
            }
            (Method::Get, ["get_smiles"]) => {
                let smiles = self
                    .docs(Collection::Wells)
                    .iter()
                    .find(|doc| {
                        in_scope(doc, param("user_account"), param("campaign_id"))
                            && doc["xtalName"] == param("xtal_name")
                    })
                    .map_or(Json::Null, |doc| doc["smiles"].clone());

                (200, json!({"smiles": smiles}))
            }
            (Method::Get, ["find_user_from_plate_id", plate]) => {
                match self.docs(Collection::Plates).iter().find(|doc| doc["plateId"] == *plate) {
                    Some(doc) => (200, json!({"user": doc["userAccount"], "campaign_id": doc["campaignId"]})),
                    None => not_found(),
                }
            }
            (Method::Get, ["is_crystal_already_fished", plate, well]) => {
                let fished = self
                    .docs(Collection::Wells)
                    .iter()
                    .any(|doc| doc["plateId"] == *plate && doc["well"] == *well && doc["fished"] == true);

                (200, json!({"result": fished}))
            }

            (Method::Post, ["export_to_soak"]) => self.export_plate(&body, Stage::Soak),
            (Method::Post, ["export_cryo_to_soak"]) => self.export_plate(&body, Stage::Cryo),
            (Method::Post, ["export_redesolve_to_soak"]) => self.export_plate(&body, Stage::Redesolve),
            (Method::Post, ["export_to_soak_selected_wells"]) => self.export_selected(&body, Stage::Soak),
            (Method::Post, ["export_cryo_to_soak_selected_wells"]) => self.export_selected(&body, Stage::Cryo),
            (Method::Post, ["export_redesolve_to_soak_selected_wells"]) => {
                self.export_selected(&body, Stage::Redesolve)
            }
            (Method::Post, ["import_soaking_results"]) => self.import_soaking_results(&body),
            (Method::Post, ["mark_soak_for_well_in_echo_done"]) => self.mark_soak_done(&body),

            (Method::Post, ["add_cryo"]) => self.treat(&body, Stage::Cryo, CRYO_FIELDS, "cryoProtection"),
            (Method::Patch, ["remove_cryo_from_well", id]) => {
                self.untreat(id, Stage::Cryo, CRYO_FIELDS, "cryoProtection")
            }
            (Method::Patch, ["redesolve_in_new_solvent"]) => {
                self.treat(&body, Stage::Redesolve, REDESOLVE_FIELDS, "redesolveApplied")
            }
            (Method::Patch, ["remove_new_solvent_from_well", id]) => {
                self.untreat(id, Stage::Redesolve, REDESOLVE_FIELDS, "redesolveApplied")
            }

            (Method::Patch, ["update_shifter_fishing_result"]) => {
                let Ok(report) = serde_json::from_value::<ShifterReport>(body["well_shifter_data"].clone()) else {
                    return (422, json!({"detail": "malformed report"}));
                };
                let index = body["xtal_name_index"].as_u64().and_then(|n| u32::try_from(n).ok());
                let name = xtal_name(text(&body["xtal_name_prefix"]), index.unwrap_or(1));

                (200, counts(self.fish(&report, &name)))
            }
            (Method::Post, ["import_fishing_results"]) => {
                let Ok(reports) = serde_json::from_value::<Vec<ShifterReport>>(body) else {
                    return (422, json!({"detail": "malformed reports"}));
                };
                let mut n = 0;
                for report in &reports {
                    let next = next_xtal_number(
                        self.docs(Collection::Wells)
                            .iter()
                            .filter(|doc| doc["plateId"] == report.plate_id.as_str())
                            .filter_map(|doc| doc["xtalName"].as_str()),
                    );
                    n += self.fish(report, &xtal_name(DEFAULT_XTAL_PREFIX, next));
                }

                (200, counts(n))
            }
            (Method::Get, ["get_next_xtal_number", plate]) => {
                let next = next_xtal_number(
                    self.docs(Collection::Wells)
                        .iter()
                        .filter(|doc| doc["plateId"] == *plate)
                        .filter_map(|doc| doc["xtalName"].as_str()),
                );

                (200, json!({"next_xtal_number": next}))
            }
            (Method::Get, ["find_last_fished_xtal", user, campaign]) => {
                let fished = self.select(Collection::Wells, |doc| {
                    in_scope(doc, user, campaign) && doc["fished"] == true
                });

                (200, json!({"result": fished}))
            }

            (Method::Get, ["get_libraries"]) => (200, self.select(Collection::Libraries, |_| true)),
            (Method::Post, ["get_campaign_libraries"]) => (
                200,
                self.select(Collection::CampaignLibraries, |doc| {
                    in_scope(doc, text(&body["user"]), text(&body["campaign_id"]))
                }),
            ),
            (Method::Get, ["get_one_library"]) => self.by_id(Collection::Libraries, param("library_id")),
            (Method::Get, ["get_one_campaign_library"]) => {
                self.by_id(Collection::CampaignLibraries, param("library_id"))
            }
            (Method::Post, ["import_library"]) => {
                let id = self.insert(Collection::Libraries, body);

                (200, json!({"result": {"ok": 1.0, "_id": id.to_hex()}}))
            }
            (Method::Post, ["add_campaign_library" | "insert_campaign_library"]) => {
                self.add(Collection::CampaignLibraries, body)
            }
            (Method::Get, ["get_library_usage_count"]) => {
                let count = self
                    .docs(Collection::Wells)
                    .iter()
                    .filter(|doc| {
                        in_scope(doc, param("user"), param("campaign_id")) && doc["libraryId"] == param("library_id")
                    })
                    .count();

                (200, json!({"count": count}))
            }

            (Method::Put, ["update_by_object_id"]) => self.update_by_object_id(&body),
            (Method::Post, ["add_fragment_to_well"]) => self.add_fragment(&body),
            (Method::Post, ["remove_fragment_from_well"]) => {
                let n = self.each_well(
                    |doc| doc["_id"] == param("well_id"),
                    |well| {
                        for field in LIBRARY_FIELDS {
                            well[*field] = Json::Null;
                        }
                        well["libraryAssigned"] = json!(false);
                    },
                );

                (200, json!({"result": legacy(n)}))
            }

            (Method::Post, ["send_notification", user, campaign, kind]) => {
                let id = self.insert(
                    Collection::Notifications,
                    json!({"userAccount": user, "campaignId": campaign, "type": kind, "timestamp": now()}),
                );

                (200, json!({"status": "success", "inserted_id": id.to_hex()}))
            }
            (Method::Get, ["get_notifications", user, campaign, since]) => {
                let notifications = self.select(Collection::Notifications, |doc| {
                    in_scope(doc, user, campaign) && text(&doc["timestamp"]) > *since
                });

                (200, json!({"notifications": notifications}))
            }

            _ => not_found(),
        }
    }

    fn delete_by_id(&mut self, collection: &str, id: &str) -> Reply {
        let Ok(collection) = collection.parse::<Collection>() else {
            return not_found();
        };
        let docs = self.docs_mut(collection);
        let before = docs.len();
        docs.retain(|doc| doc["_id"] != id);

        (200, json!({"acknowledged": true, "deleted_count": before - docs.len()}))
    }

    fn wells_from_plate(&self, request: &Request) -> Json {
        let key = CampaignScope::new(
            request.param("user_account").unwrap_or_default(),
            request.param("campaign_id").unwrap_or_default(),
        )
        .plate(request.param("plate_id").unwrap_or_default());
        let filters: Vec<&(String, String)> = request
            .query
            .iter()
            .filter(|(name, _)| !matches!(name.as_str(), "user_account" | "campaign_id" | "plate_id"))
            .collect();

        self.select(Collection::Wells, |doc| {
            on_plate(doc, &key) && filters.iter().all(|(name, wanted)| matches_query(&doc[name.as_str()], wanted))
        })
    }

    fn export_plate(&mut self, body: &Json, stage: Stage) -> Reply {
        let mut n = 0;

        for entry in body.as_array().into_iter().flatten() {
            let plate = &entry["_id"];
            let time = &entry["soak_time"];

            n += self.each_well(
                |well| well["plateId"] == *plate && takes_part(well, stage),
                |well| {
                    well[stage.status_field()] = json!("exported");
                    well[stage.export_time_field()] = time.clone();
                },
            );

            for doc in self.docs_mut(Collection::Plates).iter_mut().filter(|doc| doc["plateId"] == *plate) {
                match stage {
                    Stage::Soak => {
                        doc["soakStatus"] = json!("exported");
                        doc["soakExportTime"] = time.clone();
                    }
                    Stage::Cryo => doc["cryoProtection"] = json!(true),
                    Stage::Redesolve => doc["redesolveApplied"] = json!(true),
                }
            }
        }

        (200, counts(n))
    }

    fn export_selected(&mut self, body: &Json, stage: Stage) -> Reply {
        let time = now();

        for selected in body["data"].as_array().into_iter().flatten() {
            self.each_well(
                |well| well["_id"] == selected["_id"],
                |well| {
                    well[stage.status_field()] = json!("exported");
                    well[stage.export_time_field()] = time.clone();
                },
            );
        }

        (200, json!({"result": null}))
    }

    fn import_soaking_results(&mut self, body: &Json) -> Reply {
        let mut n = 0;

        for transfer in body.as_array().into_iter().flatten() {
            n += self.each_well(
                |well| well["plateId"] == transfer["plateId"] && well["wellEcho"] == transfer["wellEcho"],
                |well| {
                    well["soakStatus"] = json!("done");
                    well["soakTransferStatus"] = transfer["transferStatus"].clone();
                },
            );
        }

        (200, json!({"result": format!("{n} wells updated")}))
    }

    fn mark_soak_done(&mut self, body: &Json) -> Reply {
        let time = now();
        let n = self.each_well(
            |well| {
                in_scope(well, text(&body["user"]), text(&body["campaign_id"]))
                    && well["plateId"] == body["plate_id"]
                    && well["wellEcho"] == body["well_echo"]
            },
            |well| {
                well["soakStatus"] = json!("done");
                well["soakTransferStatus"] = body["transfer_status"].clone();
                well["soakTransferTime"] = time.clone();
            },
        );

        (200, counts(n))
    }

    fn treat(&mut self, body: &Json, stage: Stage, fields: &[(&str, &str)], flag: &str) -> Reply {
        let n = self.each_well(
            |well| {
                in_scope(well, text(&body["user_account"]), text(&body["campaign_id"]))
                    && well["plateId"] == body["target_plate"]
                    && well["well"] == body["target_well"]
            },
            |well| {
                for (stored, sent) in fields {
                    well[*stored] = body[*sent].clone();
                }
                well[flag] = json!(true);
                well[stage.status_field()] = json!("pending");
            },
        );

        (200, counts(n))
    }

    fn untreat(&mut self, id: &str, stage: Stage, fields: &[(&str, &str)], flag: &str) -> Reply {
        let n = self.each_well(
            |well| well["_id"] == id,
            |well| {
                for (stored, _) in fields {
                    well[*stored] = Json::Null;
                }
                well[flag] = json!(false);
                well[stage.status_field()] = Json::Null;
            },
        );

        (200, counts(n))
    }

    fn fish(&mut self, report: &ShifterReport, name: &str) -> usize {
        let label = report.well_label();

        self.each_well(
            |well| well["plateId"] == report.plate_id.as_str() && well["well"] == label.as_str(),
            |well| {
                well["fished"] = json!(true);
                well["shifterTimeOfArrival"] = robot_time(&report.time_of_arrival);
                well["shifterTimeOfDeparture"] = robot_time(&report.time_of_departure);
                well["shifterDuration"] = robot_duration(&report.duration);
                well["shifterComment"] = json!(report.comment);
                well["shifterXtalId"] = json!(report.xtal_id);
                well["xtalName"] = json!(name);
                well["puckBarcode"] = json!(report.destination_name);
                well["puckPosition"] = json!(report.destination_location);
                well["pinBarcode"] = json!(report.barcode);
                well["puckType"] = json!(report.external_comment);
            },
        )
    }

    fn update_by_object_id(&mut self, body: &Json) -> Reply {
        let Ok(collection) = text(&body["collection"]).parse::<Collection>() else {
            return (422, json!({"detail": "unknown collection"}));
        };
        let Some(fields) = body["kwargs"].as_object() else {
            return (422, json!({"detail": "kwargs must be an object"}));
        };

        let mut n = 0;
        for doc in self
            .docs_mut(collection)
            .iter_mut()
            .filter(|doc| doc["_id"] == body["doc_id"])
        {
            for (name, value) in fields {
                set_path(doc, name, value.clone());
            }
            n += 1;
        }

        (200, legacy(n))
    }

    fn add_fragment(&mut self, body: &Json) -> Reply {
        let library = &body["library"];
        let fragment = &body["fragment"];

        let n = self.each_well(
            |well| well["_id"] == body["well_id"],
            |well| {
                well["libraryId"] = library["_id"].clone();
                well["libraryName"] = library["libraryName"].clone();
                well["libraryBarcode"] = library["libraryBarcode"].clone();
                well["libraryAssigned"] = json!(true);
                well["compoundCode"] = fragment["compoundCode"].clone();
                well["smiles"] = fragment["smiles"].clone();
                well["sourceWell"] = fragment["well"].clone();
                well["libraryConcentration"] = fragment.get("libraryConcentration").cloned().unwrap_or_default();
                well["solventTest"] = body["is_solvent_test"].clone();
                well["solventVolume"] = body["solvent_volume"].clone();
                well["ligandTransferVolume"] = body["ligand_transfer_volume"].clone();
                well["ligandConcentration"] = body["ligand_concentration"].clone();
                well["soakStatus"] = json!("pending");
            },
        );

        (200, json!({"result": legacy(n)}))
    }
}
