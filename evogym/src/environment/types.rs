use evogym_core_contact_impl::ContactFeatureServiceImpl;
use evogym_email_emailjs::EmailJsGateway;

pub type Email = EmailJsGateway;

pub type Contact = ContactFeatureServiceImpl<Email>;
pub type ContactForm = evogym_core_contact_impl::ContactForm<Email>;

pub type RestServer = evogym_api_rest::RestServer<Contact>;
