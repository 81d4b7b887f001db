//! Field extraction rules
//!
//! Each field is a fixed tag path under the bibliographic block plus a small
//! post-processing step. A missing path never fails: it yields an empty
//! string, an empty list or `None`, and leaves the other fields untouched.
//!
//! Both DTD generations are searched where tag names changed
//! (`references-cited` / `us-references-cited`, `parties` / `us-parties`, ...).
//! A path segment list may offer alternatives separated by `|`; the first
//! that resolves wins.

use super::records::{Assignee, Citation, Claim, Inventor, LegalRepresentative, RelatedDocument, UsClass};
use super::PatentRecord;
use crate::align::flatten_default;
use crate::escape::escape_html_nosub;
use crate::tree::{AttributeNode, Selection};
use tracing::debug;

/// Keep only the digits of a date: "2012-03-27" becomes "20120327"
pub fn normalize_date(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// First alternative of `paths` that resolves under `node`
fn select<'a>(node: &'a AttributeNode, paths: &str) -> Option<Selection<'a>> {
    paths.split('|').find_map(|path| node.resolve_path(path).ok())
}

/// Members selected by the first alternative that resolves
fn members<'a>(node: Option<&'a AttributeNode>, paths: &str) -> Vec<&'a AttributeNode> {
    let Some(node) = node else {
        return Vec::new();
    };
    match select(node, paths) {
        Some(selection) => selection.iter().collect(),
        None => {
            debug!(path = paths, "list field absent");
            Vec::new()
        }
    }
}

/// Text of the first node at `paths`, or empty
fn text_at(node: Option<&AttributeNode>, paths: &str) -> String {
    match node.and_then(|n| select(n, paths)) {
        Some(selection) => selection.first().inner_text(),
        None => {
            debug!(path = paths, "field absent");
            String::new()
        }
    }
}

/// One column per path, one entry per member ("" where a member lacks it)
fn columns(members: &[&AttributeNode], paths: &[&str]) -> Vec<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            members
                .iter()
                .map(|m| select(m, path).map(|s| s.first().inner_text()).unwrap_or_default())
                .collect()
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Depth-first search for the first descendant named `tag`
fn find_descendant<'a>(node: &'a AttributeNode, tag: &str) -> Option<&'a AttributeNode> {
    node.children()
        .iter()
        .find_map(|child| if child.tag() == tag { Some(child) } else { find_descendant(child, tag) })
}

impl PatentRecord {
    /// The `us-bibliographic-data-*` block
    fn biblio(&self) -> Option<&AttributeNode> {
        let tag = self.document_kind().bibliographic_tag();
        match self.document().resolve(tag) {
            Ok(selection) => Some(selection.first()),
            Err(e) => {
                debug!(tag = %e.tag, "bibliographic block absent");
                None
            }
        }
    }

    /// The parties block, whichever spelling the document uses
    fn parties(&self) -> Option<&AttributeNode> {
        self.biblio()
            .and_then(|b| select(b, "us-parties|parties"))
            .map(|s| s.first())
    }

    fn publication(&self, field: &str) -> String {
        text_at(self.biblio(), &format!("publication-reference.document-id.{}", field))
    }

    fn application(&self, field: &str) -> String {
        text_at(self.biblio(), &format!("application-reference.document-id.{}", field))
    }

    pub fn country(&self) -> String {
        self.publication("country")
    }

    /// Publication (patent) number
    pub fn patent(&self) -> String {
        self.publication("doc-number")
    }

    /// Publication kind code, e.g. "B2"
    pub fn kind(&self) -> String {
        self.publication("kind")
    }

    /// Grant (publication) date as YYYYMMDD
    pub fn date_grant(&self) -> String {
        normalize_date(&self.publication("date"))
    }

    /// `appl-type` of the application reference, e.g. "utility"
    pub fn pat_type(&self) -> String {
        self.biblio()
            .and_then(|b| b.resolve("application-reference").ok())
            .and_then(|s| s.first().get_attribute("appl-type"))
            .unwrap_or_default()
            .to_string()
    }

    pub fn date_app(&self) -> String {
        normalize_date(&self.application("date"))
    }

    pub fn country_app(&self) -> String {
        self.application("country")
    }

    pub fn patent_app(&self) -> String {
        self.application("doc-number")
    }

    pub fn code_app(&self) -> String {
        text_at(self.biblio(), "us-application-series-code")
    }

    pub fn clm_num(&self) -> Option<u32> {
        text_at(self.biblio(), "number-of-claims").trim().parse().ok()
    }

    /// Main then further national classifications
    pub fn classes(&self) -> Vec<UsClass> {
        let Some(national) = self
            .biblio()
            .and_then(|b| b.resolve("classification-national").ok())
        else {
            return Vec::new();
        };
        let national = national.first();

        let mut raw = national.contents_of("main-classification");
        raw.extend(national.contents_of("further-classification"));
        raw.into_iter()
            .filter(|c| !c.trim().is_empty())
            .map(UsClass::parse)
            .collect()
    }

    /// Abstract paragraphs with `<sub>` markup kept, HTML-escaped elsewhere
    pub fn abstract_text(&self) -> String {
        let paragraphs = match self.document().resolve("abstract") {
            Ok(abstract_) => {
                let abstract_ = abstract_.first();
                match abstract_.resolve("p") {
                    Ok(p) => p.iter().map(|p| p.marked_text("sub")).collect::<Vec<_>>(),
                    Err(_) => vec![abstract_.marked_text("sub")],
                }
            }
            Err(_) => {
                debug!("abstract absent");
                return String::new();
            }
        };
        escape_html_nosub(paragraphs.join("\n").trim())
    }

    pub fn invention_title(&self) -> String {
        text_at(self.biblio(), "invention-title")
    }

    pub fn asg_list(&self) -> Vec<Assignee> {
        let assignees = members(self.biblio(), "assignees.assignee");
        flatten_default(columns(&assignees, Assignee::COLUMNS))
            .into_iter()
            .map(Assignee::from_row)
            .collect()
    }

    pub fn cit_list(&self) -> Vec<Citation> {
        let citations = members(
            self.biblio(),
            "us-references-cited.us-citation|references-cited.citation|us-references-cited.citation",
        );
        flatten_default(columns(&citations, Citation::COLUMNS))
            .into_iter()
            .map(Citation::from_row)
            .collect()
    }

    /// Parents of continuations/divisions plus provisional applications
    pub fn rel_list(&self) -> Vec<RelatedDocument> {
        let entries = members(self.biblio(), "us-related-documents");
        let mut relation: Vec<String> = Vec::new();
        let mut anchors: Vec<&AttributeNode> = Vec::new();

        for related in entries.into_iter().flat_map(|r| r.children()) {
            match related.resolve("relation") {
                Ok(relations) => {
                    for r in relations.iter() {
                        relation.push(related.tag().to_string());
                        anchors.push(r);
                    }
                }
                Err(_) => {
                    relation.push(related.tag().to_string());
                    anchors.push(related);
                }
            }
        }

        let mut cols = vec![relation];
        cols.extend(columns(&anchors, RelatedDocument::COLUMNS));
        flatten_default(cols)
            .into_iter()
            .map(RelatedDocument::from_row)
            .collect()
    }

    /// Inventors, or applicants flagged as inventors in older documents
    pub fn inv_list(&self) -> Vec<Inventor> {
        let parties = self.parties();
        let mut inventors = members(parties, "inventors.inventor");
        if inventors.is_empty() {
            inventors = members(parties, "us-applicants.us-applicant|applicants.applicant")
                .into_iter()
                .filter(|a| {
                    a.get_attribute("app-type")
                        .map_or(true, |t| t.contains("inventor"))
                })
                .collect();
        }

        flatten_default(columns(&inventors, Inventor::COLUMNS))
            .into_iter()
            .map(Inventor::from_row)
            .collect()
    }

    pub fn law_list(&self) -> Vec<LegalRepresentative> {
        let agents = members(self.parties(), "agents.agent");
        let rep_type: Vec<String> = agents
            .iter()
            .map(|a| a.get_attribute("rep-type").unwrap_or_default().to_string())
            .collect();

        let mut cols = vec![rep_type];
        cols.extend(columns(&agents, LegalRepresentative::COLUMNS));
        flatten_default(cols)
            .into_iter()
            .map(LegalRepresentative::from_row)
            .collect()
    }

    pub fn claims(&self) -> Vec<Claim> {
        let claims = members(Some(self.document()), "claims.claim");

        let number: Vec<String> = claims
            .iter()
            .map(|c| c.get_attribute("num").unwrap_or_default().to_string())
            .collect();
        let text: Vec<String> = claims
            .iter()
            .map(|c| collapse_whitespace(&c.inner_text()))
            .collect();
        let depends_on: Vec<String> = claims
            .iter()
            .map(|c| {
                find_descendant(c, "claim-ref")
                    .and_then(|r| r.get_attribute("idref"))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        flatten_default(vec![number, text, depends_on])
            .into_iter()
            .map(Claim::from_row)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(biblio: &str, rest: &str) -> PatentRecord {
        format!(
            "<us-patent-grant><us-bibliographic-data-grant>{}</us-bibliographic-data-grant>{}</us-patent-grant>",
            biblio, rest
        )
        .parse()
        .unwrap()
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("20120327"), "20120327");
        assert_eq!(normalize_date("2012-03-27"), "20120327");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_publication_fields() {
        let p = grant(
            "<publication-reference><document-id><country>US</country>\
             <doc-number>08141299</doc-number><kind>B2</kind><date>20120327</date>\
             </document-id></publication-reference>",
            "",
        );
        assert_eq!(p.country(), "US");
        assert_eq!(p.patent(), "08141299");
        assert_eq!(p.kind(), "B2");
        assert_eq!(p.date_grant(), "20120327");
        // Other fields unaffected by their absence
        assert_eq!(p.date_app(), "");
        assert_eq!(p.pat_type(), "");
    }

    #[test]
    fn test_application_fields() {
        let p = grant(
            "<application-reference appl-type=\"utility\"><document-id><country>US</country>\
             <doc-number>12540451</doc-number><date>2009-08-13</date></document-id>\
             </application-reference><us-application-series-code>12</us-application-series-code>\
             <number-of-claims> 20 </number-of-claims>",
            "",
        );
        assert_eq!(p.pat_type(), "utility");
        assert_eq!(p.patent_app(), "12540451");
        assert_eq!(p.country_app(), "US");
        assert_eq!(p.date_app(), "20090813");
        assert_eq!(p.code_app(), "12");
        assert_eq!(p.clm_num(), Some(20));
    }

    #[test]
    fn test_bad_claim_count() {
        let p = grant("<number-of-claims>many</number-of-claims>", "");
        assert_eq!(p.clm_num(), None);
    }

    #[test]
    fn test_classes() {
        let p = grant(
            "<classification-national><country>US</country>\
             <main-classification>428  99</main-classification>\
             <further-classification>428221</further-classification>\
             <further-classification>4283191</further-classification>\
             </classification-national>",
            "",
        );
        let classes = p.classes();
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[0], UsClass { class: "428".into(), subclass: "99".into() });
        assert_eq!(classes[2], UsClass { class: "428".into(), subclass: "3191".into() });
    }

    #[test]
    fn test_abstract_keeps_sub() {
        let p = grant(
            "",
            "<abstract id=\"abstract\"><p id=\"p-0001\">Uses H<sub>2</sub>O &amp; salt &lt; 5%.</p>\
             <p id=\"p-0002\">Second.</p></abstract>",
        );
        assert_eq!(
            p.abstract_text(),
            "Uses H<sub>2</sub>O &amp; salt &lt; 5%.\nSecond."
        );
    }

    #[test]
    fn test_citations_align_per_member() {
        let p = grant(
            "<references-cited>\
             <citation><patcit num=\"00001\"><document-id><country>US</country>\
             <doc-number>4123456</doc-number><kind>A</kind><name>Smith</name><date>19781010</date>\
             </document-id></patcit><category>cited by examiner</category></citation>\
             <citation><nplcit num=\"00002\"><othercit>A paper, 1999.</othercit></nplcit>\
             <category>cited by applicant</category></citation>\
             </references-cited>",
            "",
        );
        let cits = p.cit_list();
        assert_eq!(cits.len(), 2);
        assert_eq!(cits[0].doc_number, "4123456");
        assert_eq!(cits[0].category, "cited by examiner");
        assert_eq!(cits[0].other, "");
        assert_eq!(cits[1].doc_number, "");
        assert_eq!(cits[1].other, "A paper, 1999.");
        assert_eq!(cits[1].category, "cited by applicant");
    }

    #[test]
    fn test_newer_citation_spelling() {
        let p = grant(
            "<us-references-cited><us-citation><patcit><document-id><country>US</country>\
             <doc-number>5000000</doc-number></document-id></patcit></us-citation>\
             </us-references-cited>",
            "",
        );
        assert_eq!(p.cit_list().len(), 1);
    }

    #[test]
    fn test_related_documents() {
        let p = grant(
            "<us-related-documents>\
             <continuation><relation>\
             <parent-doc><document-id><country>US</country><doc-number>11000001</doc-number>\
             <date>20070101</date></document-id><parent-status>PENDING</parent-status></parent-doc>\
             <child-doc><document-id><country>US</country><doc-number>12540451</doc-number></document-id></child-doc>\
             </relation></continuation>\
             <us-provisional-application><document-id><country>US</country>\
             <doc-number>60900000</doc-number><date>20060505</date></document-id>\
             </us-provisional-application>\
             </us-related-documents>",
            "",
        );
        let rel = p.rel_list();
        assert_eq!(rel.len(), 2);
        assert_eq!(rel[0].relation, "continuation");
        assert_eq!(rel[0].doc_number, "11000001");
        assert_eq!(rel[0].status, "PENDING");
        assert_eq!(rel[1].relation, "us-provisional-application");
        assert_eq!(rel[1].date, "20060505");
        assert_eq!(rel[1].status, "");
    }

    #[test]
    fn test_inventors_from_applicants() {
        let p = grant(
            "<parties><applicants>\
             <applicant sequence=\"001\" app-type=\"applicant-inventor\"><addressbook>\
             <last-name>Doe</last-name><first-name>Jane</first-name>\
             <address><city>Austin</city><state>TX</state><country>US</country></address>\
             </addressbook><nationality><country>US</country></nationality>\
             <residence><country>US</country></residence></applicant>\
             <applicant sequence=\"002\" app-type=\"applicant\"><addressbook>\
             <orgname>Acme</orgname></addressbook></applicant>\
             </applicants></parties>",
            "",
        );
        let inv = p.inv_list();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].last_name, "Doe");
        assert_eq!(inv[0].state, "TX");
        assert_eq!(inv[0].street, "");
        assert_eq!(inv[0].nationality, "US");
    }

    #[test]
    fn test_inventors_element() {
        let p = grant(
            "<us-parties><inventors><inventor><addressbook><last-name>Roe</last-name>\
             </addressbook></inventor><inventor><addressbook><last-name>Poe</last-name>\
             </addressbook></inventor></inventors></us-parties>",
            "",
        );
        let names: Vec<String> = p.inv_list().into_iter().map(|i| i.last_name).collect();
        assert_eq!(names, vec!["Roe", "Poe"]);
    }

    #[test]
    fn test_agents_and_assignees() {
        let p = grant(
            "<parties><agents><agent sequence=\"01\" rep-type=\"attorney\"><addressbook>\
             <orgname>Law LLP</orgname><address><country>unknown</country></address>\
             </addressbook></agent></agents></parties>\
             <assignees><assignee><addressbook><orgname>Acme Corp.</orgname><role>02</role>\
             <address><city>Armonk</city><state>NY</state><country>US</country></address>\
             </addressbook></assignee></assignees>",
            "",
        );
        let law = p.law_list();
        assert_eq!(law.len(), 1);
        assert_eq!(law[0].rep_type, "attorney");
        assert_eq!(law[0].org_name, "Law LLP");

        let asg = p.asg_list();
        assert_eq!(asg.len(), 1);
        assert_eq!(asg[0].org_name, "Acme Corp.");
        assert_eq!(asg[0].role, "02");
        assert_eq!(asg[0].city, "Armonk");
    }

    #[test]
    fn test_claims() {
        let p = grant(
            "",
            "<claims id=\"claims\">\
             <claim id=\"CLM-00001\" num=\"00001\"><claim-text>1. A widget\n  comprising a part.</claim-text></claim>\
             <claim id=\"CLM-00002\" num=\"00002\"><claim-text>2. The widget of \
             <claim-ref idref=\"CLM-00001\">claim 1</claim-ref>, wherein the part is red.</claim-text></claim>\
             </claims>",
        );
        let claims = p.claims();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].number, "00001");
        assert_eq!(claims[0].text, "1. A widget comprising a part.");
        assert!(claims[0].is_independent());
        assert_eq!(claims[1].depends_on, "CLM-00001");
        assert_eq!(claims[1].text, "2. The widget of claim 1, wherein the part is red.");
    }
}
