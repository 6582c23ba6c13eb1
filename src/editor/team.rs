//! Team edit panel

use super::{
    PHOTO_SET, RowId, Rows, Saved, add_button, remove_button, save_button, seed_list, text_input,
    upload_controls,
};
use crate::config::EditorConfig;
use crate::content::TeamMember;
use crate::editor::upload::{check_image, ingest_image};
use crate::error::UploadError;
use crate::is_embedded_image;
use crate::markup::{Element, Node};
use crate::render::plan_team;
use crate::snapshot::{self, StaticTeamCard};
use crate::store::{KeyValueStore, Storage};

pub const TEAM_FIELDS_ID: &str = "lab-team-fields";

/// One team row as read back from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRowInput {
    /// The row's `data-row-id`
    pub id: RowId,
    pub name: String,
    pub degree: String,
    pub role: String,
    pub featured: bool,
}

#[derive(Debug, Clone)]
pub struct TeamPanel {
    pub members: Rows<TeamMember>,
    max_image_bytes: u64,
}

impl TeamPanel {
    pub fn open<S, F>(storage: &Storage<S>, config: &EditorConfig, scrape: F) -> Self
    where
        S: KeyValueStore,
        F: FnOnce() -> Vec<StaticTeamCard>,
    {
        let members = seed_list(storage, &config.keys.team_members, || {
            snapshot::import_team(&scrape())
        });
        Self {
            members: Rows::new(members),
            max_image_bytes: config.max_image_bytes,
        }
    }

    pub fn add_member(&mut self) -> RowId {
        self.members.push(TeamMember::default())
    }

    pub fn remove_member(&mut self, id: RowId) {
        self.members.remove(id);
    }

    pub fn check_upload(&self, mime: &str, size: u64) -> Result<(), UploadError> {
        check_image(mime, size, self.max_image_bytes)
    }

    /// Install the bytes of a read file as member `id`'s photo; `Ok(None)`
    /// when the row was removed while the file was being read
    pub fn upload_photo(
        &mut self,
        id: RowId,
        mime: &str,
        bytes: &[u8],
    ) -> Result<Option<&'static str>, UploadError> {
        let data_url = ingest_image(mime, bytes, self.max_image_bytes)?;
        let Some(member) = self.members.get_mut(id) else {
            log::warn!("Team row {} removed before its photo finished loading", id);
            return Ok(None);
        };
        member.photo = data_url;
        Ok(Some(PHOTO_SET))
    }

    /// Copy typed values into the records so a re-render keeps them
    pub fn sync_form(&mut self, rows: &[TeamRowInput]) {
        for row in rows {
            if let Some(member) = self.members.get_mut(row.id) {
                member.name = row.name.clone();
                member.degree = row.degree.clone();
                member.role = row.role.clone();
                member.featured = row.featured;
            }
        }
    }

    /// Records to persist; photos come from the panel
    pub fn collect(&self, rows: &[TeamRowInput]) -> Vec<TeamMember> {
        rows.iter()
            .map(|row| TeamMember {
                photo: self
                    .members
                    .get(row.id)
                    .map(|m| m.photo.clone())
                    .unwrap_or_default(),
                name: row.name.trim().to_string(),
                degree: row.degree.trim().to_string(),
                role: row.role.trim().to_string(),
                featured: row.featured,
            })
            .collect()
    }

    /// Persist the form and re-render the team grid
    pub fn save<S: KeyValueStore>(
        &mut self,
        storage: &Storage<S>,
        config: &EditorConfig,
        rows: &[TeamRowInput],
    ) -> Saved<Option<Vec<Node>>> {
        let members = self.collect(rows);
        let result = storage.try_set(&config.keys.team_members, &members);
        match &result {
            Ok(()) => log::info!("Team saved ({} members)", members.len()),
            Err(e) => log::warn!("Team save failed: {}", e),
        }
        self.sync_form(rows);

        Saved {
            result,
            render: plan_team(storage, &config.keys),
        }
    }

    pub fn panel(&self) -> Node {
        Element::new("div")
            .class("lab-edit-panel")
            .child(Element::new("h3").text("Edit Team"))
            .child(Element::new("div").id(TEAM_FIELDS_ID).children(self.rows()))
            .child(add_button("member", "+ Add member"))
            .child(save_button("team"))
            .into()
    }

    pub fn rows(&self) -> Vec<Node> {
        self.members
            .iter()
            .map(|(id, member)| -> Node {
                let status = if is_embedded_image(&member.photo) { PHOTO_SET } else { "" };
                Element::new("div")
                    .class("lab-edit-row lab-edit-row-team")
                    .attr("data-row-id", id.to_string())
                    .children(upload_controls(
                        "lab-team-file",
                        "lab-team-upload",
                        "lab-team-status",
                        "data-member-row",
                        id,
                        "Upload photo",
                        status,
                    ))
                    .child(text_input("text", "Name", &member.name, "data-member-name"))
                    .child(text_input(
                        "text",
                        "Degree (e.g. Ph.D.)",
                        &member.degree,
                        "data-member-degree",
                    ))
                    .child(text_input("text", "Role", &member.role, "data-member-role"))
                    .child(
                        Element::new("label")
                            .child(
                                Element::new("input")
                                    .attr("type", "checkbox")
                                    .attr("data-member-featured", "")
                                    .flag_if("checked", member.featured),
                            )
                            .text(" Featured"),
                    )
                    .child(remove_button("data-remove-member", "", "data-row-id", id))
                    .into()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::select_class;
    use crate::store::MemoryStore;

    fn scraped() -> Vec<StaticTeamCard> {
        vec![
            StaticTeamCard {
                photo: Some("img/pi.jpg".into()),
                name: Some("Grace Hopper".into()),
                degree: Some("Ph.D.".into()),
                role: Some("Principal Investigator".into()),
                featured: true,
            },
            StaticTeamCard {
                photo: Some("img/student.jpg".into()),
                name: Some("Alan".into()),
                degree: None,
                role: Some("Student".into()),
                featured: false,
            },
        ]
    }

    fn rows_for(panel: &TeamPanel) -> Vec<TeamRowInput> {
        panel
            .members
            .iter()
            .map(|(id, m)| TeamRowInput {
                id,
                name: m.name.clone(),
                degree: m.degree.clone(),
                role: m.role.clone(),
                featured: m.featured,
            })
            .collect()
    }

    fn member_at(panel: &TeamPanel, position: usize) -> &TeamMember {
        panel.members.records().nth(position).unwrap()
    }

    #[test]
    fn test_open_scrapes_when_nothing_stored() {
        let storage = Storage::new(MemoryStore::new());
        let panel = TeamPanel::open(&storage, &EditorConfig::default(), scraped);
        assert_eq!(panel.members.len(), 2);
        assert!(member_at(&panel, 0).featured);
        assert_eq!(member_at(&panel, 1).degree, "");
    }

    #[test]
    fn test_open_uses_storage() {
        let storage = Storage::new(MemoryStore::new());
        let config = EditorConfig::default();
        storage.set(
            &config.keys.team_members,
            &vec![TeamMember { name: "Stored".into(), ..Default::default() }],
        );
        let panel = TeamPanel::open(&storage, &config, Vec::new);
        assert_eq!(panel.members.len(), 1);
        assert_eq!(member_at(&panel, 0).name, "Stored");
    }

    #[test]
    fn test_save_round_trip() {
        let storage = Storage::new(MemoryStore::new());
        let config = EditorConfig::default();
        let mut panel = TeamPanel::open(&storage, &config, scraped);
        let alan = panel.members.id_at(1).unwrap();
        panel.upload_photo(alan, "image/jpeg", &[0, 0, 0]).unwrap();
        let mut rows = rows_for(&panel);
        rows[1].name = "  Alan Turing ".into();
        rows[1].featured = true;

        let saved = panel.save(&storage, &config, &rows);
        assert_eq!(saved.acknowledgment("Team"), "Team saved.");

        let stored: Vec<TeamMember> = storage.get(&config.keys.team_members).unwrap();
        assert_eq!(stored[1].name, "Alan Turing");
        assert_eq!(stored[1].photo, "data:image/jpeg;base64,AAAA");
        assert!(stored[1].featured);

        let cards = saved.render.unwrap();
        assert_eq!(select_class(&cards, "team-card-featured").len(), 2);
    }

    #[test]
    fn test_oversized_photo_rejected() {
        let storage = Storage::new(MemoryStore::new());
        let config = EditorConfig { max_image_bytes: 4, ..Default::default() };
        let mut panel = TeamPanel::open(&storage, &config, scraped);
        let pi = panel.members.id_at(0).unwrap();
        assert!(panel.check_upload("image/png", 5).is_err());
        assert!(panel.upload_photo(pi, "image/png", b"12345").is_err());
        assert_eq!(member_at(&panel, 0).photo, "img/pi.jpg");
        assert_eq!(panel.upload_photo(pi, "image/png", b"1234"), Ok(Some(PHOTO_SET)));
    }

    #[test]
    fn test_photo_after_removing_earlier_member_targets_its_own_row() {
        let storage = Storage::new(MemoryStore::new());
        let config = EditorConfig::default();
        let mut panel = TeamPanel::open(&storage, &config, Vec::new);
        let ann = panel.add_member();
        let bob = panel.add_member();
        let cy = panel.add_member();
        for (id, name) in [(ann, "Ann"), (bob, "Bob"), (cy, "Cy")] {
            panel.members.get_mut(id).unwrap().name = name.into();
        }

        panel.remove_member(ann);
        assert_eq!(panel.upload_photo(bob, "image/png", b"B"), Ok(Some(PHOTO_SET)));

        let members: Vec<_> = panel
            .members
            .records()
            .map(|m| (m.name.as_str(), m.photo.as_str()))
            .collect();
        assert_eq!(members, vec![("Bob", "data:image/png;base64,Qg=="), ("Cy", "")]);

        // A read for a member removed meanwhile is dropped
        panel.remove_member(cy);
        assert_eq!(panel.upload_photo(cy, "image/png", b"C"), Ok(None));
        assert_eq!(panel.members.len(), 1);
    }

    #[test]
    fn test_rows_markup() {
        let storage = Storage::new(MemoryStore::new());
        let mut panel = TeamPanel::open(&storage, &EditorConfig::default(), scraped);
        panel.add_member();
        let rows = panel.rows();
        assert_eq!(rows.len(), 3);
        let html = rows[0].to_html();
        assert!(html.contains(r#"<input type="checkbox" data-member-featured="" checked>"#));
        assert!(html.contains(r#"data-remove-member="" data-row-id="0""#));
        assert!(html.contains(r#"data-member-row="0""#));
        assert!(!rows[1].to_html().contains("checked"));

        panel.remove_member(panel.members.id_at(0).unwrap());
        let rows = panel.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(member_at(&panel, 0).name, "Alan");
        assert!(rows[0].to_html().contains(r#"data-row-id="1""#));
    }
}
