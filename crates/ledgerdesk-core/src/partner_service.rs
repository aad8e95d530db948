use ledgerdesk_domain::ResPartner;

use crate::error::{CoreResult, ValidationErrors};

pub struct PartnerService;

impl PartnerService {
    pub fn validate(partner: &ResPartner, existing: &[ResPartner]) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(partner.name.trim().is_empty(), "name", "Partner name is required");
        if let Some(email) = partner.email.as_deref() {
            errors.check(!is_email(email), "email", "Enter a valid email address");
        }
        if let Some(phone) = partner.phone.as_deref() {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            errors.check(
                phone.chars().any(|ch| ch.is_ascii_alphabetic()) || digits < 6,
                "phone",
                "Enter a valid phone number",
            );
        }
        let name = partner.name.trim().to_ascii_lowercase();
        let duplicate = existing.iter().any(|other| {
            other.name.trim().to_ascii_lowercase() == name
                && other.partner_type == partner.partner_type
                && other.company_id == partner.company_id
                && (partner.id.is_none() || other.id != partner.id)
        });
        errors.check(
            !name.is_empty() && duplicate,
            "name",
            format!("{} `{}` already exists", partner.partner_type, partner.name.trim()),
        );
        errors.into_result()
    }

    /// Case-insensitive name search.
    pub fn search<'a>(partners: &'a [ResPartner], term: &str) -> Vec<&'a ResPartner> {
        let needle = term.trim().to_ascii_lowercase();
        partners
            .iter()
            .filter(|partner| needle.is_empty() || partner.name.to_ascii_lowercase().contains(&needle))
            .collect()
    }
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_domain::PartnerType;

    #[test]
    fn email_shape_is_checked_when_present() {
        let mut partner = ResPartner::new("Globex", PartnerType::Vendor);
        assert!(PartnerService::validate(&partner, &[]).is_ok());
        partner.email = Some("sales@globex".into());
        assert!(PartnerService::validate(&partner, &[]).is_err());
        partner.email = Some("sales@globex.com".into());
        assert!(PartnerService::validate(&partner, &[]).is_ok());
    }

    #[test]
    fn duplicate_name_of_same_type_is_refused() {
        let mut existing = ResPartner::new("Globex", PartnerType::Vendor);
        existing.id = Some(1);
        let candidate = ResPartner::new(" globex ", PartnerType::Vendor);
        assert!(PartnerService::validate(&candidate, &[existing.clone()]).is_err());
        let customer = ResPartner::new("Globex", PartnerType::Customer);
        assert!(PartnerService::validate(&customer, &[existing]).is_ok());
    }

    #[test]
    fn search_matches_substring() {
        let partners = vec![
            ResPartner::new("Globex", PartnerType::Vendor),
            ResPartner::new("Initech", PartnerType::Customer),
        ];
        assert_eq!(PartnerService::search(&partners, "TECH").len(), 1);
        assert_eq!(PartnerService::search(&partners, "").len(), 2);
    }
}
