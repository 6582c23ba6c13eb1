//! Team page cards

use super::stored_list;
use crate::config::StorageKeys;
use crate::content::TeamMember;
use crate::markup::{Element, Node};
use crate::store::{KeyValueStore, Storage};

/// Replacement team grid, or `None` to keep the static cards
pub fn plan_team<S: KeyValueStore>(storage: &Storage<S>, keys: &StorageKeys) -> Option<Vec<Node>> {
    stored_list::<TeamMember, _>(storage, &keys.team_members).map(|members| team_cards(&members))
}

pub fn team_cards(members: &[TeamMember]) -> Vec<Node> {
    members.iter().map(team_card).collect()
}

fn team_card(member: &TeamMember) -> Node {
    let class = if member.featured {
        "team-card team-card-featured"
    } else {
        "team-card"
    };

    let mut info = Element::new("div")
        .class("team-card-info")
        .child(Element::new("h2").class("team-card-name").text(&member.name));
    // Degree line only when there is one
    if !member.degree.is_empty() {
        info = info.child(Element::new("p").class("team-card-degree").text(&member.degree));
    }
    info = info.child(Element::new("p").class("team-card-role").text(&member.role));

    Element::new("article")
        .class(class)
        .child(
            Element::new("div").class("team-card-photo-wrap").child(
                Element::new("img")
                    .attr("src", &member.photo)
                    .attr("alt", &member.name)
                    .class("team-card-photo")
                    .attr("width", "400")
                    .attr("height", "420")
                    .attr("loading", "lazy"),
            ),
        )
        .child(info)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{fragment_html, select_class};
    use crate::store::MemoryStore;

    fn member(name: &str, degree: &str, featured: bool) -> TeamMember {
        TeamMember {
            photo: format!("img/{}.jpg", name.to_lowercase()),
            name: name.to_string(),
            degree: degree.to_string(),
            role: "Researcher".to_string(),
            featured,
        }
    }

    #[test]
    fn test_no_members_keeps_static_markup() {
        let storage = Storage::new(MemoryStore::new());
        assert_eq!(plan_team(&storage, &StorageKeys::default()), None);
    }

    #[test]
    fn test_featured_and_degree() {
        let cards = team_cards(&[member("Ada", "Ph.D.", true), member("Alan", "", false)]);
        let featured = select_class(&cards, "team-card-featured");
        assert_eq!(featured.len(), 1);
        assert_eq!(select_class(&cards, "team-card").len(), 2);
        // Alan has no degree line
        assert_eq!(select_class(&cards, "team-card-degree").len(), 1);
    }

    #[test]
    fn test_card_markup() {
        let html = fragment_html(&team_cards(&[member("Ada", "Ph.D.", false)]));
        assert_eq!(
            html,
            "<article class=\"team-card\"><div class=\"team-card-photo-wrap\">\
             <img src=\"img/ada.jpg\" alt=\"Ada\" class=\"team-card-photo\" width=\"400\" height=\"420\" loading=\"lazy\">\
             </div><div class=\"team-card-info\"><h2 class=\"team-card-name\">Ada</h2>\
             <p class=\"team-card-degree\">Ph.D.</p><p class=\"team-card-role\">Researcher</p></div></article>"
        );
    }

    #[test]
    fn test_plan_preserves_order() {
        let storage = Storage::new(MemoryStore::new());
        let keys = StorageKeys::default();
        storage.set(&keys.team_members, &vec![member("Zed", "", false), member("Amy", "", false)]);
        let cards = plan_team(&storage, &keys).unwrap();
        let names: Vec<String> = select_class(&cards, "team-card-name")
            .into_iter()
            .map(|e| Node::from(e.clone()).text_content())
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }
}
